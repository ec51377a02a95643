mod queue;

pub use queue::AppointmentService;
