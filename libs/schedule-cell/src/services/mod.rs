mod ledger;

pub use ledger::ScheduleService;
