pub mod music_player;
pub mod output;
pub mod tracks;
