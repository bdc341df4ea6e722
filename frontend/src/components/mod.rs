pub mod map_view;
pub mod workout_form;
pub mod workout_list;
