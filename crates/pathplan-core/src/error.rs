//! Error types returned by the planners.

use thiserror::Error;

/// Coarse classification shared by every planner error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: bad polygon, out-of-range coordinate, non-positive size.
    InvalidInput,
    /// No path exists without crossing the buffered restricted zone.
    Unreachable,
    /// Numerically unstable configuration.
    DegenerateGeometry,
}

/// Failure of a geometric primitive.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl GeometryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeometryError::InvalidInput(_) => ErrorKind::InvalidInput,
            GeometryError::DegenerateGeometry(_) => ErrorKind::DegenerateGeometry,
        }
    }
}

/// Failure of the diversion (obstacle avoidance) router.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unreachable: {0}")]
    Unreachable(String),
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl RouteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::InvalidInput(_) => ErrorKind::InvalidInput,
            RouteError::Unreachable(_) => ErrorKind::Unreachable,
            RouteError::DegenerateGeometry(_) => ErrorKind::DegenerateGeometry,
        }
    }
}

impl From<GeometryError> for RouteError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::InvalidInput(msg) => RouteError::InvalidInput(msg),
            GeometryError::DegenerateGeometry(msg) => RouteError::DegenerateGeometry(msg),
        }
    }
}

/// Failure of the coverage (search pattern) planner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl PlanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanError::InvalidInput(_) => ErrorKind::InvalidInput,
            PlanError::DegenerateGeometry(_) => ErrorKind::DegenerateGeometry,
        }
    }
}

impl From<GeometryError> for PlanError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::InvalidInput(msg) => PlanError::InvalidInput(msg),
            GeometryError::DegenerateGeometry(msg) => PlanError::DegenerateGeometry(msg),
        }
    }
}
