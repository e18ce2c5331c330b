//! Seed rows and the knobs controlling how many of each are generated.

use chrono::NaiveDate;
use helmsman_models::enrollments::EnrollmentResult;
use uuid::Uuid;

pub struct FormationSeed {
    pub code: String,
    pub title: String,
    pub description: String,
    pub duration_days: i32,
    pub category: String,
}

pub struct CoursSeed {
    pub code: String,
    pub title: String,
    pub duration_hours: i32,
    pub formation_id: Uuid,
}

pub struct FormateurSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
}

pub struct AgentSeed {
    pub matricule: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub rank: String,
    pub department: String,
    pub birth_date: NaiveDate,
}

pub struct SessionSeed {
    pub formation_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub capacity: i32,
    pub location: String,
}

pub struct EnrollmentSeed {
    pub agent_id: Uuid,
    pub formation_id: Uuid,
    pub session_id: Uuid,
    pub result: EnrollmentResult,
    pub score: Option<f64>,
}

/// A session as returned by its insert, enough to enroll agents in it.
#[derive(Clone, Copy)]
pub struct SeededSession {
    pub id: Uuid,
    pub formation_id: Uuid,
    pub end_date: NaiveDate,
    pub capacity: i32,
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub formations: usize,
    pub cours_per_formation: usize,
    pub formateurs: usize,
    pub agents: usize,
    pub sessions_per_formation: usize,
    /// Share of each session's seats that gets filled, in percent.
    pub fill_percent: u8,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            formations: 8,
            cours_per_formation: 4,
            formateurs: 12,
            agents: 150,
            sessions_per_formation: 3,
            fill_percent: 70,
        }
    }
}

impl SeedConfig {
    pub fn new(formations: usize) -> Self {
        Self {
            formations,
            ..Default::default()
        }
    }

    pub fn total_cours(&self) -> usize {
        self.formations * self.cours_per_formation
    }

    pub fn total_sessions(&self) -> usize {
        self.formations * self.sessions_per_formation
    }

    /// Seats filled in a session of `capacity`, never more than the agents available.
    pub fn seats_to_fill(&self, capacity: i32) -> usize {
        let wanted = (capacity.max(0) as usize * self.fill_percent.min(100) as usize) / 100;
        wanted.min(self.agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let config = SeedConfig {
            formations: 5,
            cours_per_formation: 3,
            sessions_per_formation: 2,
            ..Default::default()
        };
        assert_eq!(config.total_cours(), 15);
        assert_eq!(config.total_sessions(), 10);
    }

    #[test]
    fn test_seats_to_fill_is_capped() {
        let config = SeedConfig {
            agents: 5,
            fill_percent: 100,
            ..Default::default()
        };
        assert_eq!(config.seats_to_fill(20), 5);

        let config = SeedConfig {
            agents: 100,
            fill_percent: 50,
            ..Default::default()
        };
        assert_eq!(config.seats_to_fill(20), 10);
        assert_eq!(config.seats_to_fill(-3), 0);
    }
}
