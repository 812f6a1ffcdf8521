/// This implementation is a shortened version of the RedoxOS implementation found here:
///
/// https://gitlab.redox-os.org/redox-os/syscall/-/blob/master/src/io/io.rs

/// A single hardware register of a fixed width.
pub trait Io {
    type Value: Copy + PartialEq;

    fn read(&self) -> Self::Value;
    fn write(&mut self, value: Self::Value);
}
