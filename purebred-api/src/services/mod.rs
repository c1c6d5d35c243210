pub mod message_service;
pub mod swipe_service;
