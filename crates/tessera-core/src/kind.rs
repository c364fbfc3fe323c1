//! Structure kinds known to the engine.
//!
//! A [`StructureKind`] names an engine object category (window, shader,
//! buffer, socket, ...). Kinds key the per-type storage in the memory pool
//! and carry the built-in reservation counts used when a context is
//! created without explicit overrides.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An engine-defined object category.
///
/// The discriminant is stable and dense (`0..COUNT`), so kinds can index
/// fixed per-kind tables directly via [`StructureKind::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum StructureKind {
    /// Native window wrapper.
    Window = 0,
    /// Log sink with its pattern table.
    Logger,
    /// Off-screen render target.
    FrameBuffer,
    /// Compiled shader module.
    Shader,
    /// Descriptor set layout.
    DescriptorLayout,
    /// Graphics pipeline state.
    Pipeline,
    /// GPU buffer.
    Buffer,
    /// Texture sampler.
    Sampler,
    /// 2D texture.
    Texture,
    /// Cubemap texture.
    Cubemap,
    /// Audio source.
    Sound,
    /// Network socket.
    Socket,
}

impl StructureKind {
    /// Number of structure kinds.
    pub const COUNT: usize = 12;

    /// Every kind, in discriminant order.
    pub const ALL: [StructureKind; Self::COUNT] = [
        Self::Window,
        Self::Logger,
        Self::FrameBuffer,
        Self::Shader,
        Self::DescriptorLayout,
        Self::Pipeline,
        Self::Buffer,
        Self::Sampler,
        Self::Texture,
        Self::Cubemap,
        Self::Sound,
        Self::Socket,
    ];

    /// Dense index of this kind, in `0..COUNT`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable numeric code, usable as an integer map key.
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Look up a kind by its numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Human-readable name used in log output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::Logger => "logger",
            Self::FrameBuffer => "frame_buffer",
            Self::Shader => "shader",
            Self::DescriptorLayout => "descriptor_layout",
            Self::Pipeline => "pipeline",
            Self::Buffer => "buffer",
            Self::Sampler => "sampler",
            Self::Texture => "texture",
            Self::Cubemap => "cubemap",
            Self::Sound => "sound",
            Self::Socket => "socket",
        }
    }

    /// Slot count reserved for this kind when no override is configured.
    ///
    /// Applies both to the kind's share of the shared base block and to
    /// each overflow block created once that share is exhausted.
    pub const fn default_reserved_count(self) -> u64 {
        match self {
            Self::Window | Self::Logger => 8,
            Self::FrameBuffer => 16,
            Self::Shader | Self::Sound | Self::Socket => 32,
            Self::DescriptorLayout | Self::Pipeline => 64,
            Self::Buffer | Self::Sampler | Self::Texture | Self::Cubemap => 256,
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u16> for StructureKind {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}
