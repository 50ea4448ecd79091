#[derive(Default, Debug, PartialEq, Eq)]
pub struct LatchValue<T>
where
    T: Clone,
{
    value: T,
    next: T,
    default: T,
}

impl<T> LatchValue<T>
where
    T: Clone,
{
    pub fn new(value: T) -> Self {
        LatchValue {
            value: value.clone(),
            next: value.clone(),
            default: value,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.next = value;
    }

    pub fn latch_next(&mut self) {
        self.value = self.next.clone();
    }

    pub fn reset(&mut self) {
        self.value = self.default.clone();
        self.next = self.default.clone();
    }
}

/// Unsigned value of the `width`-bit field starting at bit `lsb` (bit 0 is the LSB).
pub fn field(value: u32, lsb: u32, width: u32) -> u32 {
    if width >= 32 {
        return value >> lsb;
    }
    (value >> lsb) & ((1 << width) - 1)
}

pub fn extract(value: u32, lsb: u32, width: u32, sign_extend: bool) -> i32 {
    let raw = field(value, lsb, width);
    if sign_extend {
        sign_extend_32(width, raw as i32)
    } else {
        raw as i32
    }
}

pub fn sign_extend_32(bits: u32, value: i32) -> i32 {
    let extend_bits = 32 - bits;
    (value << extend_bits) >> extend_bits
}

/// Takes bits `from..=to` of `value` and places them so that the top bit lands
/// at bit `position - 1`. A `position` of 0 leaves the slice right-aligned.
pub fn slice_32(from: u32, to: u32, value: u32, position: u32) -> u32 {
    let span = from - to + 1;
    let sliced = (value >> to) & ((1 << span) - 1);

    if position != 0 {
        return sliced << (position - span);
    }

    sliced
}

pub fn bit(index: u32, value: u32, position: u32) -> u32 {
    ((value >> index) & 1) << (position - 1)
}
