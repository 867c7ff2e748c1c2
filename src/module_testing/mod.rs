//! scenario tests that run whole configurations through the planner.

mod properties;
mod static_website;
mod template;
