//! Code-point range lookup used to pick a tokenizer state for a character

const DIRECT_SIZE: usize = 256;

#[derive(Debug, Clone)]
struct Interval<T> {
    from: u32,
    to: u32,
    value: T,
}

/// Maps inclusive code-point ranges to values
///
/// The first 256 code points resolve through a direct array. Everything above
/// goes through an interval list where the most recently added range wins.
#[derive(Debug, Clone)]
pub struct CharIntervalMap<T: Clone> {
    direct: Vec<Option<T>>,
    intervals: Vec<Interval<T>>,
}

impl<T: Clone> CharIntervalMap<T> {
    pub fn new() -> Self {
        Self {
            direct: vec![None; DIRECT_SIZE],
            intervals: Vec::new(),
        }
    }

    /// Look up the value registered for a character
    pub fn lookup(&self, ch: char) -> Option<&T> {
        let code = ch as u32;
        if (code as usize) < DIRECT_SIZE {
            return self.direct[code as usize].as_ref();
        }

        self.intervals
            .iter()
            .find(|interval| interval.from <= code && code <= interval.to)
            .map(|interval| &interval.value)
    }

    /// Assign `value` to every character in `from..=to`
    ///
    /// A reversed range is swapped rather than rejected.
    pub fn add_interval(&mut self, from: char, to: char, value: T) {
        let (mut from, to) = if from > to {
            (to as u32, from as u32)
        } else {
            (from as u32, to as u32)
        };

        while (from as usize) < DIRECT_SIZE && from <= to {
            self.direct[from as usize] = Some(value.clone());
            from += 1;
        }

        if from <= to {
            self.intervals.insert(0, Interval { from, to, value });
        }
    }

    pub fn clear(&mut self) {
        self.direct.iter_mut().for_each(|slot| *slot = None);
        self.intervals.clear();
    }
}

impl<T: Clone> Default for CharIntervalMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
