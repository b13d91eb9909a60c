// Application layer: state that lives around the finder (favorites, theme).

pub mod state;
