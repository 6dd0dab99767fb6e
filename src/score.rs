/// Something that keeps count of eaten apples.
pub trait Scorable {
    fn score(&self) -> u32;
    fn record_apple(&mut self);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCounter {
    apples: u32,
}

impl Scorable for ScoreCounter {
    fn score(&self) -> u32 {
        self.apples
    }

    fn record_apple(&mut self) {
        self.apples = self.apples.saturating_add(1);
    }
}
