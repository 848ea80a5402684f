pub mod map_view;
pub mod popup;
pub mod profession_filter;
