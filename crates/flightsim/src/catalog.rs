//! The built-in simulator table.

use crate::config::Config;
use crate::simulators::{c2dns, dga, scan, tunnel, C2Dns, Dga, PortScan, Resolver, Tunnel};
use flightsim_core::{Catalog, CatalogEntry, Result};
use std::sync::Arc;
use std::time::Duration;

/// Pause between DNS lookups in normal pacing.
const LOOKUP_INTERVAL: Duration = Duration::from_millis(500);

/// Builds the catalog in its fixed execution order.
pub fn default_catalog(config: &Config) -> Result<Catalog> {
    let resolver = Resolver::from_settings(&config.dns);

    Catalog::new(vec![
        CatalogEntry::new(
            c2dns::NAME,
            &["Preparing random sample of current C2 domains"],
            "Resolving {}",
            Arc::new(C2Dns::new(&config.c2, resolver.clone())),
            LOOKUP_INTERVAL,
        ),
        CatalogEntry::new(
            dga::NAME,
            &["Generating list of DGA domains"],
            "Resolving {}",
            Arc::new(Dga::new(&config.dga, resolver.clone())),
            LOOKUP_INTERVAL,
        ),
        CatalogEntry::new(
            scan::NAME,
            &[
                "Preparing random sample of RFC 1918 destinations",
                "Preparing random sample of common TCP destination ports",
            ],
            "Port scanning {}",
            Arc::new(PortScan::new(&config.scan)),
            Duration::ZERO,
        ),
        CatalogEntry::new(
            tunnel::NAME,
            &["Preparing DNS tunnel hostnames"],
            "Resolving {}",
            Arc::new(Tunnel::new(&config.tunnel, resolver)),
            LOOKUP_INTERVAL,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightsim_core::selector;

    fn catalog() -> Catalog {
        let mut config = Config::default();
        config.dns.nameserver = Some("127.0.0.1:53".parse().unwrap());
        default_catalog(&config).unwrap()
    }

    #[test]
    fn test_fixed_order_and_intervals() {
        let catalog = catalog();
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["c2-dns", "dga", "scan", "tunnel"]
        );
        assert_eq!(catalog.get("c2-dns").unwrap().interval(), Duration::from_millis(500));
        assert_eq!(catalog.get("scan").unwrap().interval(), Duration::ZERO);
        assert_eq!(catalog.get("scan").unwrap().phases().len(), 2);
        assert_eq!(
            catalog.get("scan").unwrap().announce("10.0.0.1"),
            "Port scanning 10.0.0.1"
        );
    }

    #[test]
    fn test_selection_uses_catalog_order() {
        let catalog = catalog();
        let selected = selector::resolve(&catalog, &["tunnel", "c2-dns"]).unwrap();
        let names: Vec<_> = selected.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["c2-dns", "tunnel"]);

        assert!(selector::resolve(&catalog, &["scan", "beacon"]).is_err());
    }
}
