//! Crate-level test suite: algorithm checks against synthetic skies and
//! real-sky scenarios against the bundled ephemeris.

mod support;
