pub mod info_window;
pub mod map_view;
pub mod mode_selector;
pub mod uploads_list;
