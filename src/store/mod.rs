pub mod campaigns;
pub mod sentiment;
