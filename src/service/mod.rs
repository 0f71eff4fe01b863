//! Business rules of the attendance service. Handlers in `api` only extract
//! request parts and serialize what these functions return.

pub mod aceptacion;
pub mod aprendiz;
pub mod instructor;
pub mod registro;
pub mod scoping;
