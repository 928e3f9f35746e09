pub mod submission;

pub use submission::{NewSubmission, PhotoRef, Submission};
