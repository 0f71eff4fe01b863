pub mod aprendiz;
pub mod asistencia;
pub mod instructor;
pub mod novedad;
