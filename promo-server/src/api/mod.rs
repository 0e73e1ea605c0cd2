pub mod campaigns;
pub mod health;
pub mod pickup;
pub mod pricing;
