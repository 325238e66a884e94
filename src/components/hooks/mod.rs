mod use_scroll_tracker;

pub use use_scroll_tracker::*;
