pub mod now_playing;
pub mod queue_panel;
pub mod track_list;
