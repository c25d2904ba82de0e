/// Box blur for blur backgrounds.
pub mod blur;
/// Compositing kernels and transition blends.
pub mod composite;
/// Transition kinds and presets.
pub mod transitions;
