/*! The ZFS ioctl transport boundary.
 *
 * This models the shape of the single ioctl the ZFS kernel driver exposes
 * for libzfs_core-style calls: a fixed-size command buffer carrying a
 * bounded pool/dataset name, pointers and sizes for an input and an output
 * nvlist blob, and a kernel-filled error code. Per spec.md §4.5 this is an
 * external collaborator, not part of the codec: this module builds and
 * parses the command buffer and defines the [`IoctlTransport`] trait, but
 * never issues a real `ioctl(2)` syscall. A caller supplies the transport;
 * encoded bytes in, encoded bytes (or an error) out.
 */

use core::fmt;

use fixedstr::str16;

////////////////////////////////////////////////////////////////////////////////

/// `ZFS_IOC_LIBZFS_CORE`, the single ioctl command code used for every
/// libzfs_core call; the command buffer's `zc_name` field picks out the
/// actual operation.
pub const ZFS_IOC_LIBZFS_CORE: u32 = (('Z' as u32) << 8) | 0x100 | 1;

/// `PATH_MAX`: the bound on `zc_name`, matching the reference `zfs_cmd_t`.
pub const PATH_MAX: usize = 4096;

/// Total size of the `zfs_cmd_t` command buffer. Compatibility-mandated by
/// the kernel ABI; unused trailing bytes beyond the stable prefix are zero.
pub const COMMAND_BUFFER_SIZE: usize = 14 * 1024;

const NAME_OFFSET: usize = 0;
const NVLIST_SRC_OFFSET: usize = PATH_MAX;
const NVLIST_SRC_SIZE_OFFSET: usize = NVLIST_SRC_OFFSET + 8;
const NVLIST_DST_OFFSET: usize = NVLIST_SRC_SIZE_OFFSET + 8;
const NVLIST_DST_SIZE_OFFSET: usize = NVLIST_DST_OFFSET + 8;
const NVLIST_DST_FILLED_OFFSET: usize = NVLIST_DST_SIZE_OFFSET + 8;
const REAL_ERR_OFFSET: usize = NVLIST_DST_FILLED_OFFSET + 1;
const STABLE_PREFIX_SIZE: usize = REAL_ERR_OFFSET + 4;

const _: () = assert!(STABLE_PREFIX_SIZE <= COMMAND_BUFFER_SIZE);

/// The `zfs_cmd_t`-compatible command buffer: a fixed 14 KiB byte image with
/// a stable prefix (name, nvlist pointers/sizes, dst-filled flag, real
/// error) and zero padding for the rest.
///
/// [`CommandBuffer`] never dereferences the pointer fields it stores; they
/// are plain integers derived from slice addresses, exactly as the
/// reference encoder stores `(uint64_t)innvl`/`(uint64_t)outnvl`.
#[derive(Clone)]
pub struct CommandBuffer {
    bytes: [u8; COMMAND_BUFFER_SIZE],
}

impl CommandBuffer {
    /** Builds a command buffer for one ioctl call.
     *
     * `input` and `output` addresses and lengths are recorded in the buffer
     * exactly as the reference `zfs_ioctl`/`do_ioctl` helpers do; `output`'s
     * capacity (not its current contents) is what gets recorded as
     * `zc_nvlist_dst_size`.
     *
     * # Errors
     *
     * Returns [`IoctlError::NameTooLong`] if `name` does not fit in
     * [`PATH_MAX`] bytes.
     */
    pub fn build(name: &str, input: &[u8], output: &mut [u8]) -> Result<CommandBuffer, IoctlError> {
        if name.len() >= PATH_MAX {
            return Err(IoctlError::NameTooLong {
                name: name.into(),
                length: name.len(),
                max: PATH_MAX - 1,
            });
        }

        let mut bytes = [0u8; COMMAND_BUFFER_SIZE];
        bytes[NAME_OFFSET..NAME_OFFSET + name.len()].copy_from_slice(name.as_bytes());

        let src_ptr = input.as_ptr() as usize as u64;
        let src_size = input.len() as u64;
        let dst_ptr = output.as_mut_ptr() as usize as u64;
        let dst_size = output.len() as u64;

        bytes[NVLIST_SRC_OFFSET..NVLIST_SRC_OFFSET + 8].copy_from_slice(&src_ptr.to_ne_bytes());
        bytes[NVLIST_SRC_SIZE_OFFSET..NVLIST_SRC_SIZE_OFFSET + 8]
            .copy_from_slice(&src_size.to_ne_bytes());
        bytes[NVLIST_DST_OFFSET..NVLIST_DST_OFFSET + 8].copy_from_slice(&dst_ptr.to_ne_bytes());
        bytes[NVLIST_DST_SIZE_OFFSET..NVLIST_DST_SIZE_OFFSET + 8]
            .copy_from_slice(&dst_size.to_ne_bytes());
        bytes[NVLIST_DST_FILLED_OFFSET] = if output.is_empty() { 0 } else { 1 };
        // zc_real_err starts zeroed; the transport fills it in on return.

        Ok(CommandBuffer { bytes })
    }

    /// Returns the full 14 KiB buffer, as the kernel sees it.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a mutable view of the full buffer, for a transport to hand to
    /// the actual syscall.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Returns the `zc_nvlist_dst_filled` flag as written (or, after a call,
    /// as the kernel left it).
    pub fn dst_filled(&self) -> bool {
        self.bytes[NVLIST_DST_FILLED_OFFSET] != 0
    }

    /// Returns `zc_real_err`, the kernel's true error code, independent of
    /// the raw `ioctl(2)` return value.
    ///
    /// The reference `ioctl.c` contains `if (err = 0)` -- an
    /// assignment-vs-comparison typo that always executes and always
    /// assigns `errno = cmd.zc_real_err` regardless of whether the ioctl
    /// actually failed. [`IoctlTransport::call`] implementations must read
    /// this field honestly and must not reproduce that bug by unconditionally
    /// treating it as success.
    pub fn real_error(&self) -> i32 {
        let mut b = [0u8; 4];
        b.copy_from_slice(&self.bytes[REAL_ERR_OFFSET..REAL_ERR_OFFSET + 4]);
        i32::from_ne_bytes(b)
    }
}

impl fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuffer")
            .field("dst_filled", &self.dst_filled())
            .field("real_error", &self.real_error())
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Accepts a kernel file descriptor, a command code, a target name, and an
/// input/output byte slice pair; submits them to the kernel and reports the
/// kernel's real error on failure. Implementations own the actual
/// `ioctl(2)` call; this crate supplies no such implementation.
pub trait IoctlTransport {
    /** Submits `input` under `name` and fills as much of `output` as the
     * kernel returns.
     *
     * # Errors
     *
     * Returns [`IoctlError::Kernel`] carrying `zc_real_err` whenever the
     * kernel reports failure, never masking it.
     */
    fn call(
        &mut self,
        handle: i32,
        command: u32,
        name: &str,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, IoctlError>;
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub enum IoctlError {
    /** `name` does not fit in [`PATH_MAX`] bytes.
     *
     * - `name`   - Truncated preview of the offending name.
     * - `length` - Full length of `name`, in bytes.
     * - `max`    - Maximum length accepted.
     */
    NameTooLong {
        name: str16,
        length: usize,
        max: usize,
    },

    /** The kernel reported a nonzero `zc_real_err`.
     *
     * - `real_error` - The kernel-returned error code.
     */
    Kernel { real_error: i32 },
}

impl fmt::Display for IoctlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoctlError::NameTooLong { name, length, max } => {
                if *length > name.len() {
                    write!(
                        f,
                        "ioctl name of length {length} exceeds max {max}: '{name}...'"
                    )
                } else {
                    write!(f, "ioctl name of length {length} exceeds max {max}: '{name}'")
                }
            }
            IoctlError::Kernel { real_error } => {
                write!(f, "ioctl kernel real_error {real_error}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IoctlError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_buffer_records_name_and_sizes() {
        let input = [1u8, 2, 3];
        let mut output = [0u8; 8];
        let cmd = CommandBuffer::build("tank/data", &input, &mut output).unwrap();

        assert_eq!(&cmd.as_bytes()[..9], b"tank/data");
        assert_eq!(cmd.as_bytes()[9], 0);
        assert!(cmd.dst_filled());
        assert_eq!(cmd.real_error(), 0);
    }

    #[test]
    fn empty_output_is_not_marked_filled() {
        let input = [1u8];
        let mut output: [u8; 0] = [];
        let cmd = CommandBuffer::build("tank", &input, &mut output).unwrap();
        assert!(!cmd.dst_filled());
    }

    #[test]
    fn oversized_name_is_rejected() {
        let name = "x".repeat(PATH_MAX);
        let input: [u8; 0] = [];
        let mut output: [u8; 0] = [];
        match CommandBuffer::build(&name, &input, &mut output) {
            Err(IoctlError::NameTooLong { length, .. }) => assert_eq!(length, PATH_MAX),
            other => panic!("expected NameTooLong, got {other:?}"),
        }
    }

    #[test]
    fn command_buffer_total_size_matches_kernel_abi() {
        let input: [u8; 0] = [];
        let mut output: [u8; 0] = [];
        let cmd = CommandBuffer::build("x", &input, &mut output).unwrap();
        assert_eq!(cmd.as_bytes().len(), COMMAND_BUFFER_SIZE);
    }

    struct MockTransport {
        real_error: i32,
    }

    impl IoctlTransport for MockTransport {
        fn call(
            &mut self,
            _handle: i32,
            _command: u32,
            name: &str,
            input: &[u8],
            output: &mut [u8],
        ) -> Result<usize, IoctlError> {
            let _cmd = CommandBuffer::build(name, input, output)?;
            if self.real_error != 0 {
                return Err(IoctlError::Kernel {
                    real_error: self.real_error,
                });
            }
            let n = input.len().min(output.len());
            output[..n].copy_from_slice(&input[..n]);
            Ok(n)
        }
    }

    #[test]
    fn kernel_error_is_never_masked() {
        let mut transport = MockTransport { real_error: 5 };
        let mut output = [0u8; 4];
        let result = transport.call(3, ZFS_IOC_LIBZFS_CORE, "tank", &[1, 2], &mut output);
        match result {
            Err(IoctlError::Kernel { real_error }) => assert_eq!(real_error, 5),
            other => panic!("expected Kernel error, got {other:?}"),
        }
    }

    #[test]
    fn successful_call_propagates_output() {
        let mut transport = MockTransport { real_error: 0 };
        let mut output = [0u8; 4];
        let n = transport
            .call(3, ZFS_IOC_LIBZFS_CORE, "tank", &[9, 9], &mut output)
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(&output[..2], &[9, 9]);
    }

    #[test]
    fn command_code_matches_reference_formula() {
        assert_eq!(ZFS_IOC_LIBZFS_CORE, 23297);
    }
}
