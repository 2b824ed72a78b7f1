pub mod config;
pub mod errors;
pub mod navigation;
pub mod schema;
pub mod session;

pub use config::AppConfig;
pub use errors::MsnapError;
pub use navigation::{
    AddPetFlags,
    Screen,
    Step,
};
pub use schema::SectionId;
pub use session::{
    PetInfo,
    RecipientInfo,
    Session,
};
