mod persistence;

pub use persistence::{
    load_catalog, load_dishes, load_profile, load_weekly, save_plan, save_profile, save_weekly,
    write_plan_csv,
};
