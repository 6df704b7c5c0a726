// Persona profile: resume + summary loading and the persona prompts built from them.

pub mod loader;
pub mod prompts;

pub use loader::load_profile;
