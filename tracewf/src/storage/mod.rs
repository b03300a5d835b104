pub mod job_window;

pub use job_window::JobWindow;
