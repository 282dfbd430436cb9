// Utility modules shared by the timeline core and the view layer

pub mod date;
