//! Entity Enumerator
//!
//! Lists every resource of a kind visible to the exporter, one namespace at a
//! time when the exporter is restricted to a set of namespaces.

use crate::domain::ports::{ListScope, MirroredResource, ResourceLister};
use crate::error::Error;
use std::sync::Arc;
use tracing::{error, warn};

/// List resources across `allowed_namespaces` (all namespaces when empty)
///
/// Listing never fails: a namespace whose list call errors is logged and
/// left out, and a failed cluster-wide list yields nothing. No ordering is
/// guaranteed.
pub fn enumerate<K: MirroredResource>(
    lister: &dyn ResourceLister<K>,
    allowed_namespaces: &[String],
) -> Vec<Arc<K>> {
    if allowed_namespaces.is_empty() {
        return match lister.list(ListScope::All) {
            Ok(resources) => resources,
            Err(e) => {
                log_list_error::<K>(ListScope::All, &e);
                Vec::new()
            }
        };
    }

    let mut resources = Vec::new();
    for namespace in allowed_namespaces {
        let scope = ListScope::Namespace(namespace);
        match lister.list(scope) {
            Ok(found) => resources.extend(found),
            Err(e) => log_list_error::<K>(scope, &e),
        }
    }
    resources
}

fn log_list_error<K: MirroredResource>(scope: ListScope<'_>, e: &Error) {
    if e.is_transient() {
        warn!(kind = K::KIND, namespace = %scope, error = %e, "Couldn't list resources");
    } else {
        error!(kind = K::KIND, namespace = %scope, error = %e, "Couldn't list resources");
    }
}
