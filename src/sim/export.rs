//! Typed views over the engine's arrays for the host
//!
//! The ids are a wire contract with the JavaScript side and never change.

use super::state::Engine;

/// Exported array ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DataArray {
    Active = 0,
    Kind = 1,
    X = 2,
    Y = 3,
    SpeedX = 4,
    SpeedY = 5,
    MaxSpeed = 6,
    Rot = 7,
    RotSpeed = 8,
    Graphic = 9,
    Frame = 10,
    Flip = 11,
    Timer = 12,
    SettingsInt = 13,
    SettingsFloat = 14,
}

impl DataArray {
    pub const ALL: [DataArray; 15] = [
        DataArray::Active,
        DataArray::Kind,
        DataArray::X,
        DataArray::Y,
        DataArray::SpeedX,
        DataArray::SpeedY,
        DataArray::MaxSpeed,
        DataArray::Rot,
        DataArray::RotSpeed,
        DataArray::Graphic,
        DataArray::Frame,
        DataArray::Flip,
        DataArray::Timer,
        DataArray::SettingsInt,
        DataArray::SettingsFloat,
    ];

    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    pub fn as_raw(self) -> u32 {
        self as u32
    }
}

/// One exported column, either 32-bit int or 32-bit float
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Column<'a> {
    Int(&'a [i32]),
    Float(&'a [f32]),
}

impl<'a> Column<'a> {
    pub fn len(&self) -> usize {
        match self {
            Column::Int(values) => values.len(),
            Column::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw native-endian bytes, as the host reads them out of linear memory
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Column::Int(values) => bytemuck::cast_slice(values),
            Column::Float(values) => bytemuck::cast_slice(values),
        }
    }
}

impl Engine {
    /// Read-only view of one exported array
    pub fn column(&self, array: DataArray) -> Column<'_> {
        let s = &self.store;
        match array {
            DataArray::Active => Column::Int(&s.active),
            DataArray::Kind => Column::Int(&s.kind),
            DataArray::X => Column::Float(&s.x),
            DataArray::Y => Column::Float(&s.y),
            DataArray::SpeedX => Column::Float(&s.speed_x),
            DataArray::SpeedY => Column::Float(&s.speed_y),
            DataArray::MaxSpeed => Column::Float(&s.max_speed),
            DataArray::Rot => Column::Float(&s.rot),
            DataArray::RotSpeed => Column::Float(&s.rot_speed),
            DataArray::Graphic => Column::Int(&s.graphic),
            DataArray::Frame => Column::Float(&s.frame),
            DataArray::Flip => Column::Int(&s.flip),
            DataArray::Timer => Column::Float(&s.timer),
            DataArray::SettingsInt => Column::Int(self.settings.ints()),
            DataArray::SettingsFloat => Column::Float(self.settings.floats()),
        }
    }
}
