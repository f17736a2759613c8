//! Dynamic binding to an external ITM shared library.

use crate::types::validate_pfl;
use crate::{ItmError, ItmResult, ItmWarnings, LinkParameters, PathLoss, PropagationOracle};
use libloading::Library;
use std::ffi::{c_long, OsStr};
use std::path::PathBuf;
use tracing::debug;

/// Environment variable naming the ITM shared library to load.
pub const ITM_LIBRARY_ENV: &str = "MESHRF_ITM_LIBRARY";

const P2P_TLS_SYMBOL: &[u8] = b"ITM_P2P_TLS\0";
const SUCCESS: i32 = 0;
const SUCCESS_WITH_WARNINGS: i32 = 1;

/// `ITM_P2P_TLS` entry point. Writes the loss and warning bits through the
/// last two pointers and returns an ITM status code. `warnings` is a C
/// `long`, 8 bytes on LP64 targets.
type P2pTlsFn = unsafe extern "C" fn(
    tx_height_m: f64,
    rx_height_m: f64,
    pfl: *const f64,
    climate: i32,
    surface_refractivity: f64,
    frequency_mhz: f64,
    polarization: i32,
    ground_permittivity: f64,
    ground_conductivity: f64,
    mdvar: i32,
    time_pct: f64,
    location_pct: f64,
    situation_pct: f64,
    loss_db: *mut f64,
    warnings: *mut c_long,
) -> i32;

/// Handle to a loaded ITM shared library.
///
/// The library stays loaded for the lifetime of the handle; the resolved
/// function pointer is only called while `_library` is alive.
pub struct Itm {
    p2p_tls: P2pTlsFn,
    path: PathBuf,
    _library: Library,
}

impl std::fmt::Debug for Itm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Itm").field("path", &self.path).finish()
    }
}

impl Itm {
    /// Load the ITM library from an explicit path.
    pub fn load<P: AsRef<OsStr>>(path: P) -> ItmResult<Self> {
        let path = PathBuf::from(path.as_ref());

        // SAFETY: loading a library runs its initializers; the caller chose
        // this file as an ITM build.
        let library =
            unsafe { Library::new(&path) }.map_err(|e| ItmError::LoadError(e.to_string()))?;

        // SAFETY: the symbol type matches the upstream ITM_P2P_TLS signature.
        let p2p_tls = unsafe { library.get::<P2pTlsFn>(P2P_TLS_SYMBOL) }
            .map(|symbol| *symbol)
            .map_err(|_| ItmError::SymbolNotFound("ITM_P2P_TLS".to_string()))?;

        debug!(path = %path.display(), "Loaded ITM library");

        Ok(Self {
            p2p_tls,
            path,
            _library: library,
        })
    }

    /// Load the ITM library from `MESHRF_ITM_LIBRARY`, falling back to the
    /// platform library name (`itm.dll`, `libitm.so`, `libitm.dylib`) on the
    /// loader search path.
    pub fn load_default() -> ItmResult<Self> {
        match std::env::var_os(ITM_LIBRARY_ENV) {
            Some(path) => {
                if !PathBuf::from(&path).exists() {
                    return Err(ItmError::LibraryNotFound);
                }
                Self::load(path)
            }
            None => Self::load(libloading::library_filename("itm")).map_err(|e| match e {
                ItmError::LoadError(_) => ItmError::LibraryNotFound,
                other => other,
            }),
        }
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Point-to-point loss with time/location/situation variability.
    pub fn p2p_tls(&self, pfl: &[f64], link: &LinkParameters) -> ItmResult<PathLoss> {
        call_p2p_tls(self.p2p_tls, pfl, link)
    }
}

fn call_p2p_tls(p2p_tls: P2pTlsFn, pfl: &[f64], link: &LinkParameters) -> ItmResult<PathLoss> {
    if !validate_pfl(pfl) {
        return Err(ItmError::InvalidTerrainProfile);
    }

    let mut loss_db = 0.0f64;
    let mut warnings: c_long = 0;

    // SAFETY: `pfl` was validated to hold `pfl[0] + 3` samples, which is
    // exactly what ITM reads. The out-pointers reference live locals of the
    // declared C types (`double`, `long`).
    let code = unsafe {
        p2p_tls(
            link.tx_height_m,
            link.rx_height_m,
            pfl.as_ptr(),
            link.climate as i32,
            link.surface_refractivity,
            link.frequency_mhz,
            link.polarization as i32,
            link.ground_permittivity,
            link.ground_conductivity,
            link.mdvar.into(),
            link.time_pct,
            link.location_pct,
            link.situation_pct,
            &mut loss_db,
            &mut warnings,
        )
    };

    match code {
        SUCCESS | SUCCESS_WITH_WARNINGS => Ok(PathLoss {
            loss_db,
            // Warning flags live in the low bits.
            warnings: ItmWarnings::from_bits(warnings as i32),
        }),
        other => Err(ItmError::from_code(other)),
    }
}

impl PropagationOracle for Itm {
    fn estimate_path_loss(&self, pfl: &[f64], link: &LinkParameters) -> ItmResult<PathLoss> {
        self.p2p_tls(pfl, link)
    }
}
