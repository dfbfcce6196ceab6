pub mod app;
pub mod scene_image;
pub mod settings;
pub mod settings_io;
pub mod sidebar;
pub mod story_panel;
