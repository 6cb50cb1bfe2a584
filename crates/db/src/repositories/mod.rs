//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Aggregate writes (a parent
//! plus its nested children) run inside a single transaction.

pub mod exercise_repo;
pub mod muscle_group_repo;
pub mod plan_repo;
pub mod session_repo;
pub mod user_repo;
pub mod workout_repo;

pub use exercise_repo::ExerciseRepo;
pub use muscle_group_repo::MuscleGroupRepo;
pub use plan_repo::PlanRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
pub use workout_repo::WorkoutRepo;
