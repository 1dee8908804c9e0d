//! Handoff of finished frames to whatever drives the physical screen.

use crate::surface::Surface;

/// Display buffer addressed by a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Front,
    Back,
}

/// Driver side of the renderer. The renderer never implements this; it only hands over
/// finished surfaces. An implementation must have consumed or copied a submitted frame by
/// the time [`Display::wait_ready`] returns.
pub trait Display {
    type Error;

    /// Queues the packed contents of `frame` for `target`.
    fn submit(&mut self, target: Target, frame: &Surface) -> Result<(), Self::Error>;

    /// Blocks until the previous submission has been acknowledged.
    fn wait_ready(&mut self) -> Result<(), Self::Error>;

    /// Makes the back buffer visible.
    fn swap(&mut self) -> Result<(), Self::Error>;
}

/// Double-buffered presentation: wait for the last frame, upload to the back buffer, flip.
pub fn present<D: Display>(display: &mut D, frame: &Surface) -> Result<(), D::Error> {
    display.wait_ready()?;
    display.submit(Target::Back, frame)?;
    display.swap()
}
