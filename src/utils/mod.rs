pub mod logs;

pub use logs::{
    log_essay_header, log_ml_disabled, log_ml_error, log_ml_model_loaded, log_ml_ready,
    log_ml_step, print_report, render_report,
};
