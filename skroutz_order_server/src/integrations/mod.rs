pub mod skroutz;
