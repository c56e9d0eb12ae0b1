// Wed Jan 15 2026 - Alex

use crate::model::{MemoryModelVariant, RuntimeMemoryModel};
use indexmap::IndexMap;
use std::env;

pub const VM_NAME: &str = "vm.name";
pub const VM_VENDOR: &str = "vm.vendor";
pub const VM_BITMODE: &str = "vm.bitmode";
pub const VM_VERSION: &str = "vm.version";
pub const ARCH_DATA_MODEL: &str = "arch.data.model";
pub const GC_COLLECTORS: &str = "gc.collectors";
pub const COMPRESSED_REFS: &str = "vm.option.compressed_refs";
pub const BOOTSTRAP_LIBRARY_PATH: &str = "vm.bootstrap.library.path";

const ENV_MAPPINGS: [(&str, &str); 8] = [
    ("SIZEOF_VM_NAME", VM_NAME),
    ("SIZEOF_VM_VENDOR", VM_VENDOR),
    ("SIZEOF_VM_BITMODE", VM_BITMODE),
    ("SIZEOF_VM_VERSION", VM_VERSION),
    ("SIZEOF_DATA_MODEL", ARCH_DATA_MODEL),
    ("SIZEOF_GC", GC_COLLECTORS),
    ("SIZEOF_COMPRESSED_REFS", COMPRESSED_REFS),
    ("SIZEOF_BOOTSTRAP_LIBRARY_PATH", BOOTSTRAP_LIBRARY_PATH),
];

const CONCURRENT_MARK_SWEEP: &str = "ConcurrentMarkSweep";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vendor {
    HotSpot,
    OpenJdk,
    Ibm,
    Unknown,
}

/// Host properties consulted by [`detect`].
#[derive(Debug, Clone, Default)]
pub struct HostProbe {
    properties: IndexMap<String, String>,
}

impl HostProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `SIZEOF_*` environment variables, falling back to the target
    /// pointer width for the data model.
    pub fn from_env() -> Self {
        let mut probe = Self::new();
        for (var, key) in ENV_MAPPINGS {
            if let Ok(value) = env::var(var) {
                probe.properties.insert(key.to_string(), value);
            }
        }
        if !probe.properties.contains_key(ARCH_DATA_MODEL) {
            let width = if cfg!(target_pointer_width = "64") { "64" } else { "32" };
            probe.properties.insert(ARCH_DATA_MODEL.to_string(), width.to_string());
        }
        probe
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    fn is_64_bit(&self) -> bool {
        if let Some(mode) = self.property(VM_BITMODE) {
            return mode == "64";
        }
        if let Some(model) = self.property(ARCH_DATA_MODEL) {
            return model == "64";
        }
        if let Some(version) = self.property(VM_VERSION) {
            return version.contains("_64");
        }
        false
    }

    fn vendor(&self) -> Vendor {
        let name = self.property(VM_NAME).unwrap_or("");
        let lower = name.to_lowercase();
        if lower.contains("hotspot") {
            Vendor::HotSpot
        } else if lower.contains("openjdk") {
            Vendor::OpenJdk
        } else if name.contains("IBM") && self.property(VM_VENDOR).is_some_and(|v| v.contains("IBM")) {
            Vendor::Ibm
        } else {
            Vendor::Unknown
        }
    }

    fn concurrent_mark_sweep(&self) -> bool {
        self.property(GC_COLLECTORS)
            .map(|gcs| gcs.split(',').any(|gc| gc.trim() == CONCURRENT_MARK_SWEEP))
            .unwrap_or(false)
    }

    fn compressed_oops(&self) -> bool {
        self.property(COMPRESSED_REFS)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    fn ibm_compressed_refs(&self) -> bool {
        self.property(BOOTSTRAP_LIBRARY_PATH)
            .is_some_and(|p| p.contains("compressedrefs"))
    }
}

/// Picks the catalog variant matching the probed host.
pub fn detect_variant(probe: &HostProbe) -> MemoryModelVariant {
    use MemoryModelVariant::*;

    let is_64_bit = probe.is_64_bit();
    let cms = probe.concurrent_mark_sweep();
    let compressed = probe.compressed_oops();

    match probe.vendor() {
        Vendor::HotSpot => match (is_64_bit, compressed, cms) {
            (true, true, true) => HotSpot64CompressedOopsCms,
            (true, true, false) => HotSpot64CompressedOops,
            (true, false, true) => HotSpot64Cms,
            (true, false, false) => HotSpot64,
            (false, _, true) => HotSpot32Cms,
            (false, _, false) => HotSpot32,
        },
        Vendor::OpenJdk => match (is_64_bit, compressed, cms) {
            (true, true, true) => OpenJdk64CompressedOopsCms,
            (true, true, false) => OpenJdk64CompressedOops,
            (true, false, true) => OpenJdk64Cms,
            (true, false, false) => OpenJdk64,
            (false, _, true) => OpenJdk32Cms,
            (false, _, false) => OpenJdk32,
        },
        Vendor::Ibm => match (is_64_bit, probe.ibm_compressed_refs()) {
            (true, true) => Ibm64CompressedRefs,
            (true, false) => Ibm64,
            (false, _) => Ibm32,
        },
        Vendor::Unknown => MemoryModelVariant::generic(is_64_bit),
    }
}

pub fn detect(probe: &HostProbe) -> RuntimeMemoryModel {
    let model = RuntimeMemoryModel::from_variant(detect_variant(probe));
    log::info!("Detected host memory model settings of: {}", model.description());
    model
}

pub fn detect_from_env() -> RuntimeMemoryModel {
    detect(&HostProbe::from_env())
}
