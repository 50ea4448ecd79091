pub mod decode;
pub mod execute;
pub mod fetch;
pub mod memory_access;
pub mod write_back;

use crate::error::ExecutionError;

pub trait PipelineStage<T> {
    fn compute(&mut self, params: T) -> Result<(), ExecutionError>;
    fn latch_next(&mut self);
    fn reset(&mut self);
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Stage {
    Fetch,
    Decode,
    Execute,
    MemoryAccess,
    WriteBack,
    UpdatePc,
}

impl Stage {
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Fetch => Some(Stage::Decode),
            Stage::Decode => Some(Stage::Execute),
            Stage::Execute => Some(Stage::MemoryAccess),
            Stage::MemoryAccess => Some(Stage::WriteBack),
            Stage::WriteBack => Some(Stage::UpdatePc),
            Stage::UpdatePc => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let mut order = vec![Stage::Fetch];
        while let Some(next) = order.last().and_then(|stage| stage.next()) {
            order.push(next);
        }
        assert_eq!(
            order,
            [
                Stage::Fetch,
                Stage::Decode,
                Stage::Execute,
                Stage::MemoryAccess,
                Stage::WriteBack,
                Stage::UpdatePc,
            ]
        );
    }
}
