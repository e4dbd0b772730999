pub mod color;
pub mod dashboard_view;
pub mod filters_box;
pub mod help;
pub mod item_view;
pub mod record_list;
pub mod status_bar;
pub mod tabs;
