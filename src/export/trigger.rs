use crate::i18n::keys;
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-slot busy flag standing in for the disabled export control.
#[derive(Debug, Default)]
pub struct ExportTrigger {
    busy: AtomicBool,
}

impl ExportTrigger {
    pub fn is_enabled(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    pub fn label_key(&self) -> &'static str {
        if self.is_enabled() {
            keys::DOWNLOAD_PDF
        } else {
            keys::GENERATING
        }
    }

    /// Disable the control until the returned guard drops. `None` while an
    /// export is already running.
    pub fn engage(&self) -> Option<EngagedTrigger<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| EngagedTrigger { trigger: self })
    }
}

#[derive(Debug)]
pub struct EngagedTrigger<'a> {
    trigger: &'a ExportTrigger,
}

impl Drop for EngagedTrigger<'_> {
    fn drop(&mut self) {
        self.trigger.busy.store(false, Ordering::Release);
    }
}
