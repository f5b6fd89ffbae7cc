//! Business logic services

pub mod attendance;
pub mod calendar;
pub mod employees;
pub mod events;
pub mod resolver;
pub mod settings;
pub mod sweep;

use crate::{config::AttendanceConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub calendar: calendar::CalendarService,
    pub resolver: resolver::DayResolver,
    pub events: events::EventsService,
    pub settings: settings::SettingsService,
    pub attendance: attendance::AttendanceService,
    pub sweep: sweep::SweepService,
    pub employees: employees::EmployeesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AttendanceConfig) -> Self {
        let calendar = calendar::CalendarService::new(repository.clone());
        let resolver = resolver::DayResolver::new(repository.clone(), calendar.clone());

        Self {
            events: events::EventsService::new(repository.clone(), calendar.clone()),
            settings: settings::SettingsService::new(repository.clone(), calendar.clone()),
            attendance: attendance::AttendanceService::new(repository.clone(), resolver.clone()),
            sweep: sweep::SweepService::new(
                repository.clone(),
                resolver.clone(),
                config.sweep_skips_holidays,
            ),
            employees: employees::EmployeesService::new(repository.clone()),
            calendar,
            resolver,
            repository,
        }
    }
}
