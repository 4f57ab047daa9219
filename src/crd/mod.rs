//! Custom Resource Definitions read by the exporter
//!
//! This module contains the Rook CRD types:
//! - CephBlockPool: RBD pool with optional mirroring
//! - CephBlockPoolRadosNamespace: rados namespace inside a pool
//! - Mirroring status types shared by both

pub mod ceph_block_pool;
pub mod mirroring;
pub mod rados_namespace;

pub use ceph_block_pool::*;
pub use mirroring::*;
pub use rados_namespace::*;
