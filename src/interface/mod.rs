pub mod prompts;
pub mod render;

pub use prompts::{collect_profile, match_disease, prompt_diseases, prompt_yes_no, split_list};
pub use render::{display_eligibility, display_plan, display_targets};
