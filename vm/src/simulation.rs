//! Start/stop lifecycle around an MMU running the write-then-read workload.

use log::info;

use crate::{
    backing_store::BackingStore,
    error::{Result, VmError},
    mmu::Mmu,
    recorder::AccessRecorder,
    Cell,
};

/// Summary returned by [`Simulation::stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    pub total_page_faults: usize,
    pub fault_order: Vec<usize>,
    pub reference_string: String,
    /// Dirty frames written back when the run stopped.
    pub flushed_frames: usize,
}

/// Drives an MMU through every address: first write each address with its
/// own value, then read each one back and check it.
pub struct Simulation<S: BackingStore, R: AccessRecorder> {
    mmu: Mmu<S, R>,
}

impl<S, R> Simulation<S, R>
where
    S: BackingStore,
    R: AccessRecorder,
{
    pub fn new(mmu: Mmu<S, R>) -> Self {
        Simulation { mmu }
    }

    pub fn mmu(&self) -> &Mmu<S, R> {
        &self.mmu
    }

    pub fn mmu_mut(&mut self) -> &mut Mmu<S, R> {
        &mut self.mmu
    }

    pub fn start(&mut self) -> Result<()> {
        let len = self.mmu.config().address_space_len();

        info!(
            "simulation: running {} addresses with {} replacement",
            len,
            self.mmu.policy()
        );

        for address in 0..len {
            self.mmu.write(address, address as Cell)?;
        }

        for address in 0..len {
            let expected = address as Cell;
            let found = self.mmu.read(address)?;

            if found != expected {
                return Err(VmError::ValueMismatch {
                    address,
                    expected,
                    found,
                });
            }
        }

        Ok(())
    }

    pub fn stop(&mut self) -> Result<SimulationReport> {
        let flushed_frames = self.mmu.flush()?;

        let report = SimulationReport {
            total_page_faults: self.mmu.fault_count(),
            fault_order: self.mmu.fault_order().to_vec(),
            reference_string: self.mmu.reference_string(),
            flushed_frames,
        };

        info!("simulation: ended, {} page faults", report.total_page_faults);
        info!("simulation: order of page faults: {}", report.reference_string);

        Ok(report)
    }

    pub fn into_mmu(self) -> Mmu<S, R> {
        self.mmu
    }
}
