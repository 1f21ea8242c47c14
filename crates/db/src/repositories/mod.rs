//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods take `&mut PgConnection` as the first argument so the caller
//! owns the unit of work: services begin one transaction per logical
//! operation and pass it through every repository call it spans.

pub mod apartment_image_repo;
pub mod apartment_parameter_link_repo;
pub mod apartment_repo;
pub mod attribute_repo;
pub mod category_repo;
pub mod house_attribute_link_repo;
pub mod house_image_repo;
pub mod house_repo;
pub mod order_repo;
pub mod parameter_repo;
pub mod user_repo;

pub use apartment_image_repo::ApartmentImageRepo;
pub use apartment_parameter_link_repo::ApartmentParameterLinkRepo;
pub use apartment_repo::ApartmentRepo;
pub use attribute_repo::AttributeRepo;
pub use category_repo::CategoryRepo;
pub use house_attribute_link_repo::HouseAttributeLinkRepo;
pub use house_image_repo::HouseImageRepo;
pub use house_repo::HouseRepo;
pub use order_repo::OrderRepo;
pub use parameter_repo::ParameterRepo;
pub use user_repo::UserRepo;
