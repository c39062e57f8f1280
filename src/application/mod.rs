// Application layer - Use cases over the domain and its outbound ports
pub mod device_gateway;
pub mod device_service;
pub mod narrative_service;
pub mod report_service;
pub mod text_generator;
