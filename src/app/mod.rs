//! Main application module for PlanMeter.
//!
//! | Sub-module        | Responsibility |
//! | ----------------- | -------------- |
//! | [`planmeter_app`] | Standalone [`PlanMeterApp`] (eframe) wrapper: menu bar, side panels, plan canvas |
//! | [`run`]           | Top-level [`run_planmeter()`] entry point |

mod planmeter_app;
mod run;

pub use planmeter_app::PlanMeterApp;
pub use run::{run_planmeter, run_planmeter_with_config};
