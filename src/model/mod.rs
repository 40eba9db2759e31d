pub mod campaign;
pub mod selection;
pub mod sentiment;
pub mod webhook;
