pub mod cards;
pub mod envelope;
pub mod users;

pub use cards::{
    BoardRecord, CardPatch, CreateBoardRequest, CreateProjectRequest, NewCard, ProjectResponse,
    UpdateBoardRequest,
};
pub use envelope::{Envelope, Meta};
pub use users::{Credentials, ProjectListing, Registration, UpdateProfileRequest, User};
