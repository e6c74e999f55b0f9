//! Bit-packed per-cell pattern data and its transition function.

use std::sync::LazyLock;

use super::{CellState, StructureType, STRUCTURE_TYPE_COUNT};

/// Per-cell pattern record, packed into 14 bits:
///
/// ```text
/// Gap3Clos(1) | Gap3(1) | PrevClos(1) | PrevLen(2) | StructClos(1) | StructLen(3) | SeqClos(1) | SeqLen(4)
///      13         12         11          10..9          8              7..5            4           3..0
/// ```
///
/// `sequence` is the run of own stones ending at this cell, `structure`
/// the run that just ended (read on the first empty or blocked cell
/// after it), `previous_structure` a clamped memory of the structure one
/// hole back, which is what lets a single-gap three (`XX_X` / `X_XX`)
/// be recognized at the cell closing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellPattern(u16);

const SEQ_LEN_MASK: u16 = 0b1111;
const SEQ_CLOSED_BIT: u16 = 1 << 4;
const STRUCT_LEN_SHIFT: u16 = 5;
const STRUCT_LEN_MASK: u16 = 0b111 << STRUCT_LEN_SHIFT;
const STRUCT_CLOSED_BIT: u16 = 1 << 8;
const PREV_LEN_SHIFT: u16 = 9;
const PREV_LEN_MASK: u16 = 0b11 << PREV_LEN_SHIFT;
const PREV_CLOSED_BIT: u16 = 1 << 11;
const GAP_THREE_BIT: u16 = 1 << 12;
const GAP_THREE_CLOSED_BIT: u16 = 1 << 13;

const DATA_BITS: u32 = 14;

impl CellPattern {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence_length: u8,
        is_sequence_closed: bool,
        structure_length: u8,
        is_structure_closed: bool,
        previous_structure_length: u8,
        is_previous_structure_closed: bool,
        is_gap_open_three: bool,
        is_gap_open_three_closed: bool,
    ) -> Self {
        let mut data = 0u16;
        data |= sequence_length.min(15) as u16;
        data |= if is_sequence_closed { SEQ_CLOSED_BIT } else { 0 };
        data |= (structure_length.min(7) as u16) << STRUCT_LEN_SHIFT;
        data |= if is_structure_closed { STRUCT_CLOSED_BIT } else { 0 };
        data |= (previous_structure_length.min(3) as u16) << PREV_LEN_SHIFT;
        data |= if is_previous_structure_closed { PREV_CLOSED_BIT } else { 0 };
        data |= if is_gap_open_three { GAP_THREE_BIT } else { 0 };
        data |= if is_gap_open_three_closed { GAP_THREE_CLOSED_BIT } else { 0 };
        Self(data)
    }

    #[inline]
    pub fn from_bits(data: u16) -> Self {
        debug_assert!(data < (1 << DATA_BITS));
        Self(data)
    }

    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Sentinel stored in the matrix halo: a closed zero-length
    /// sequence, so board edges behave like opponent stones.
    #[inline]
    pub fn pre_bound() -> Self {
        Self::new(0, true, 0, false, 0, false, false, false)
    }

    #[inline]
    pub fn sequence_length(self) -> u8 {
        (self.0 & SEQ_LEN_MASK) as u8
    }

    #[inline]
    pub fn is_sequence_closed(self) -> bool {
        self.0 & SEQ_CLOSED_BIT != 0
    }

    #[inline]
    pub fn structure_length(self) -> u8 {
        ((self.0 & STRUCT_LEN_MASK) >> STRUCT_LEN_SHIFT) as u8
    }

    #[inline]
    pub fn is_structure_closed(self) -> bool {
        self.0 & STRUCT_CLOSED_BIT != 0
    }

    #[inline]
    pub fn previous_structure_length(self) -> u8 {
        ((self.0 & PREV_LEN_MASK) >> PREV_LEN_SHIFT) as u8
    }

    #[inline]
    pub fn is_previous_structure_closed(self) -> bool {
        self.0 & PREV_CLOSED_BIT != 0
    }

    #[inline]
    pub fn is_gap_open_three(self) -> bool {
        self.0 & GAP_THREE_BIT != 0
    }

    #[inline]
    pub fn is_gap_open_three_closed(self) -> bool {
        self.0 & GAP_THREE_CLOSED_BIT != 0
    }

    /// The structure this cell reports, gapped threes taking precedence
    /// over the plain run reading.
    pub fn relevant_structure(self) -> StructureType {
        if self.is_gap_open_three() {
            return if self.is_gap_open_three_closed() {
                StructureType::Three
            } else {
                StructureType::OpenThree
            };
        }
        if self.structure_length() > 0 {
            return StructureType::from_run(self.structure_length(), self.is_structure_closed());
        }
        StructureType::None
    }

    /// Add this cell's contribution to the per-class count vector,
    /// multiplied by `factor` (+1 on write, -1 to retract the old data).
    ///
    /// A gapped three is built out of two runs that were already counted
    /// separately, so recognizing one also retracts the two halves.
    pub fn accumulate_counts(self, counts: &mut [i32; STRUCTURE_TYPE_COUNT], factor: i32) {
        let length = self.structure_length();
        if length > 0 && length < 5 {
            counts[StructureType::from_run(length, self.is_structure_closed()).index()] += factor;
        }
        if length >= 5 {
            counts[StructureType::FiveOrMore.index()] += factor;
        }

        if self.is_gap_open_three() {
            if self.is_gap_open_three_closed() {
                counts[StructureType::Three.index()] += factor;

                let short_half_first = if self.is_structure_closed() {
                    length == 1
                } else {
                    length == 2
                };
                if short_half_first {
                    counts[StructureType::One.index()] -= factor;
                    counts[StructureType::OpenTwo.index()] -= factor;
                } else {
                    counts[StructureType::Two.index()] -= factor;
                    counts[StructureType::OpenOne.index()] -= factor;
                }
            } else {
                counts[StructureType::OpenThree.index()] += factor;
                counts[StructureType::OpenOne.index()] -= factor;
                counts[StructureType::OpenTwo.index()] -= factor;
            }
        }
    }

    /// Transition function: the data of the next cell along a scan
    /// direction, given the next cell's state.
    pub fn following(self, state: CellState) -> CellPattern {
        let sequence_length;
        let is_sequence_closed;
        let structure_length;
        let is_structure_closed;
        let mut previous_structure_length;
        let mut is_previous_structure_closed;
        let is_gap_open_three;
        let is_gap_open_three_closed;

        match state {
            CellState::Empty => {
                sequence_length = 0;
                is_sequence_closed = false;
                structure_length = self.sequence_length();
                is_structure_closed = self.is_sequence_closed();
                previous_structure_length = structure_length;
                is_previous_structure_closed = is_structure_closed;
                is_gap_open_three = (self.previous_structure_length() == 2
                    && structure_length == 1)
                    || (self.previous_structure_length() == 1 && structure_length == 2);
                is_gap_open_three_closed = if is_gap_open_three {
                    self.is_previous_structure_closed()
                } else {
                    false
                };
            }
            CellState::Stoned => {
                sequence_length = self.sequence_length() + 1;
                is_sequence_closed = self.is_sequence_closed();
                structure_length = 0;
                is_structure_closed = false;
                previous_structure_length = self.previous_structure_length();
                is_previous_structure_closed = self.is_previous_structure_closed();
                is_gap_open_three = false;
                is_gap_open_three_closed = false;
            }
            CellState::Blocked => {
                sequence_length = 0;
                is_sequence_closed = true;
                let structure_present = (!self.is_sequence_closed()
                    && self.sequence_length() > 0)
                    || self.sequence_length() >= 5;
                structure_length = if structure_present {
                    self.sequence_length()
                } else {
                    0
                };
                is_structure_closed = structure_present;
                previous_structure_length = 0;
                is_previous_structure_closed = false;
                is_gap_open_three = !self.is_previous_structure_closed()
                    && ((self.previous_structure_length() == 2 && structure_length == 1)
                        || (self.previous_structure_length() == 1 && structure_length == 2));
                is_gap_open_three_closed = is_gap_open_three;
            }
        }

        if is_gap_open_three {
            previous_structure_length = 0;
            is_previous_structure_closed = false;
        }

        CellPattern::new(
            sequence_length,
            is_sequence_closed,
            structure_length,
            is_structure_closed,
            previous_structure_length,
            is_previous_structure_closed,
            is_gap_open_three,
            is_gap_open_three_closed,
        )
    }

    /// Memoized transition lookup: every (data, state) pair fits in a
    /// 2^16-entry table built once per process.
    #[inline]
    pub fn following_memoized(self, state: CellState) -> CellPattern {
        static TABLE: LazyLock<Vec<CellPattern>> = LazyLock::new(|| {
            let mut table = vec![CellPattern::default(); 1 << 16];
            for data in 0..(1u16 << DATA_BITS) {
                let cell = CellPattern::from_bits(data);
                for state in [CellState::Empty, CellState::Stoned, CellState::Blocked] {
                    table[memo_index(cell, state)] = cell.following(state);
                }
            }
            table
        });
        TABLE[memo_index(self, state)]
    }
}

#[inline]
fn memo_index(cell: CellPattern, state: CellState) -> usize {
    ((cell.bits() as usize) << 2) | state as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_packing_round_trip() {
        let cell = CellPattern::new(5, true, 3, false, 2, true, false, false);
        assert_eq!(cell.sequence_length(), 5);
        assert!(cell.is_sequence_closed());
        assert_eq!(cell.structure_length(), 3);
        assert!(!cell.is_structure_closed());
        assert_eq!(cell.previous_structure_length(), 2);
        assert!(cell.is_previous_structure_closed());
    }

    #[test]
    fn test_field_clamping() {
        let cell = CellPattern::new(20, false, 9, false, 5, false, false, false);
        assert_eq!(cell.sequence_length(), 15);
        assert_eq!(cell.structure_length(), 7);
        assert_eq!(cell.previous_structure_length(), 3);
    }

    #[test]
    fn test_pre_bound_is_closed_empty() {
        let cell = CellPattern::pre_bound();
        assert_eq!(cell.sequence_length(), 0);
        assert!(cell.is_sequence_closed());
        assert_eq!(cell.structure_length(), 0);
        assert_eq!(cell.bits(), 0b10000);
    }

    #[test]
    fn test_run_grows_and_is_read_on_empty() {
        // Edge, then three stones, then a hole: the hole reports a
        // closed three.
        let mut cell = CellPattern::pre_bound();
        for _ in 0..3 {
            cell = cell.following(CellState::Stoned);
        }
        assert_eq!(cell.sequence_length(), 3);
        assert!(cell.is_sequence_closed());

        let after = cell.following(CellState::Empty);
        assert_eq!(after.structure_length(), 3);
        assert!(after.is_structure_closed());
        assert_eq!(after.relevant_structure(), StructureType::Three);
    }

    #[test]
    fn test_open_run_from_empty_start() {
        let mut cell = CellPattern::default().following(CellState::Empty);
        for _ in 0..2 {
            cell = cell.following(CellState::Stoned);
        }
        let after = cell.following(CellState::Empty);
        assert_eq!(after.relevant_structure(), StructureType::OpenTwo);
    }

    #[test]
    fn test_gap_open_three_detected() {
        // _ X X _ X _  scanned left to right: the final hole sees a
        // one-stone run with a two-stone structure one hole back.
        let mut cell = CellPattern::default();
        cell = cell.following(CellState::Empty);
        cell = cell.following(CellState::Stoned);
        cell = cell.following(CellState::Stoned);
        cell = cell.following(CellState::Empty);
        cell = cell.following(CellState::Stoned);
        cell = cell.following(CellState::Empty);

        assert!(cell.is_gap_open_three());
        assert!(!cell.is_gap_open_three_closed());
        assert_eq!(cell.relevant_structure(), StructureType::OpenThree);
    }

    #[test]
    fn test_gap_three_closed_when_first_half_blocked() {
        // Edge X X _ X _ : same shape but the pair is closed on the
        // left, so the gapped three is closed too.
        let mut cell = CellPattern::pre_bound();
        cell = cell.following(CellState::Stoned);
        cell = cell.following(CellState::Stoned);
        cell = cell.following(CellState::Empty);
        cell = cell.following(CellState::Stoned);
        cell = cell.following(CellState::Empty);

        assert!(cell.is_gap_open_three());
        assert!(cell.is_gap_open_three_closed());
        assert_eq!(cell.relevant_structure(), StructureType::Three);
    }

    #[test]
    fn test_two_holes_break_the_gap() {
        // _ X X _ _ X _ : the pair is two holes back, no gapped three.
        let mut cell = CellPattern::default();
        for state in [
            CellState::Empty,
            CellState::Stoned,
            CellState::Stoned,
            CellState::Empty,
            CellState::Empty,
            CellState::Stoned,
            CellState::Empty,
        ] {
            cell = cell.following(state);
        }
        assert!(!cell.is_gap_open_three());
        assert_eq!(cell.relevant_structure(), StructureType::OpenOne);
    }

    #[test]
    fn test_blocked_only_reports_open_or_five_runs() {
        // A closed run shorter than five ends at a block without a
        // structure (it was already dead).
        let mut cell = CellPattern::pre_bound();
        for _ in 0..4 {
            cell = cell.following(CellState::Stoned);
        }
        let blocked = cell.following(CellState::Blocked);
        assert_eq!(blocked.structure_length(), 0);

        // An open run of the same length becomes a closed four.
        let mut cell = CellPattern::default().following(CellState::Empty);
        for _ in 0..4 {
            cell = cell.following(CellState::Stoned);
        }
        let blocked = cell.following(CellState::Blocked);
        assert_eq!(blocked.relevant_structure(), StructureType::Four);

        // Five or more survives even when closed on both sides.
        let mut cell = CellPattern::pre_bound();
        for _ in 0..5 {
            cell = cell.following(CellState::Stoned);
        }
        let blocked = cell.following(CellState::Blocked);
        assert_eq!(blocked.relevant_structure(), StructureType::FiveOrMore);
    }

    #[test]
    fn test_memoized_matches_direct() {
        for data in 0..(1u16 << 14) {
            let cell = CellPattern::from_bits(data);
            for state in [CellState::Empty, CellState::Stoned, CellState::Blocked] {
                assert_eq!(cell.following_memoized(state), cell.following(state));
            }
        }
    }

    #[test]
    fn test_gap_three_count_correction() {
        let mut cell = CellPattern::default();
        for state in [
            CellState::Empty,
            CellState::Stoned,
            CellState::Stoned,
            CellState::Empty,
            CellState::Stoned,
            CellState::Empty,
        ] {
            cell = cell.following(state);
        }

        let mut counts = [0i32; STRUCTURE_TYPE_COUNT];
        cell.accumulate_counts(&mut counts, 1);

        // The open one the plain reading would report is replaced by the
        // gapped open three, and the open two counted two cells back is
        // retracted.
        assert_eq!(counts[StructureType::OpenThree.index()], 1);
        assert_eq!(counts[StructureType::OpenOne.index()], 0);
        assert_eq!(counts[StructureType::OpenTwo.index()], -1);
    }
}
