pub mod notification;
pub mod thermal_event;
