//! Recursive ownership traversal.
//!
//! Depth-first and strictly sequential: each registry fetch completes before
//! the next begins, so sibling order is deterministic and the request rate
//! stays bounded against the registry's per-key throttling. Cycle detection
//! uses an explicit path-scoped identifier stack, independent of the depth
//! limit.

use futures::future::BoxFuture;

use super::model::{ChildStatus, OwnershipNode, ResolvedController};
use super::Registry;
use crate::companies_house::types::CompanyNumber;
use crate::error::{ErrorKind, RegistryError};

/// Default recursion depth for corporate PSC chains.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Outcome of resolving one identifier somewhere below the root.
enum ResolveOutcome {
    Node(OwnershipNode),
    DepthLimit,
    Cycle,
    Failed(ErrorKind),
}

/// Resolves a company's ownership chain into an [`OwnershipNode`] tree.
///
/// Holds no state across invocations; each [`resolve`](Self::resolve) call
/// owns its own path stack and produces an independent tree, so concurrent
/// traversals do not interact.
pub struct OwnershipResolver<R> {
    registry: R,
    max_depth: usize,
}

impl<R: Registry> OwnershipResolver<R> {
    pub fn new(registry: R, max_depth: usize) -> Self {
        Self {
            registry,
            max_depth,
        }
    }

    /// Resolve the ownership tree rooted at `root`.
    ///
    /// Failures fetching the root itself propagate verbatim; failures on any
    /// deeper node are recorded as [`ChildStatus::LookupFailed`] on that
    /// node's entry and do not abort the traversal. `max_depth` of 0 resolves
    /// only the root's own PSC list.
    pub async fn resolve(&self, root: &CompanyNumber) -> Result<OwnershipNode, RegistryError> {
        let mut profile = self.registry.profile(root).await?;
        let parties = self.registry.controlling_parties(root).await?;

        // Structured capital is best-effort and root-only; filings rarely
        // carry it below the top company.
        match self.registry.share_capital(root).await {
            Ok(capital) => profile.share_capital = capital,
            Err(err) => {
                tracing::warn!(company = %root, error = %err, "share capital unavailable");
            }
        }

        let mut path = vec![root.clone()];
        let mut controllers = Vec::with_capacity(parties.len());
        for party in parties {
            controllers.push(self.resolve_controller(party, 0, &mut path).await);
        }

        Ok(OwnershipNode {
            profile,
            controllers,
        })
    }

    /// Classify one controller and, for resolvable corporate entities,
    /// descend into its own ownership chain.
    async fn resolve_controller(
        &self,
        party: super::model::ControllingParty,
        depth: usize,
        path: &mut Vec<CompanyNumber>,
    ) -> ResolvedController {
        let Some(target) = party.recursion_target() else {
            return ResolvedController {
                party,
                status: ChildStatus::NotCorporate,
                child: None,
            };
        };

        let (status, child) = match self.resolve_node(target, depth + 1, path).await {
            ResolveOutcome::Node(node) => (ChildStatus::Resolved, Some(node)),
            ResolveOutcome::DepthLimit => (ChildStatus::DepthLimitReached, None),
            ResolveOutcome::Cycle => (ChildStatus::CycleDetected, None),
            ResolveOutcome::Failed(kind) => (ChildStatus::LookupFailed(kind), None),
        };

        ResolvedController {
            party,
            status,
            child,
        }
    }

    /// Resolve a non-root identifier at `depth` with ancestor path `path`.
    ///
    /// Invariant: `path` holds exactly the identifiers on the active
    /// root-to-parent chain, so membership means a cycle. The depth and cycle
    /// checks both run before any fetch. Boxed because the future recurses
    /// through `resolve_controller`.
    fn resolve_node<'a>(
        &'a self,
        number: CompanyNumber,
        depth: usize,
        path: &'a mut Vec<CompanyNumber>,
    ) -> BoxFuture<'a, ResolveOutcome> {
        Box::pin(async move {
            if depth > self.max_depth {
                return ResolveOutcome::DepthLimit;
            }
            if path.contains(&number) {
                tracing::debug!(company = %number, "cycle detected on active path");
                return ResolveOutcome::Cycle;
            }

            let profile = match self.registry.profile(&number).await {
                Ok(profile) => profile,
                Err(err) => {
                    tracing::warn!(company = %number, error = %err, "profile lookup failed");
                    return ResolveOutcome::Failed(err.kind());
                }
            };
            let parties = match self.registry.controlling_parties(&number).await {
                Ok(parties) => parties,
                Err(err) => {
                    tracing::warn!(company = %number, error = %err, "PSC lookup failed");
                    return ResolveOutcome::Failed(err.kind());
                }
            };

            path.push(number);
            let mut controllers = Vec::with_capacity(parties.len());
            for party in parties {
                controllers.push(self.resolve_controller(party, depth, path).await);
            }
            path.pop();

            ResolveOutcome::Node(OwnershipNode {
                profile,
                controllers,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::resolver::model::{
        CompanyProfile, CompanyStatus, ControlKind, ControllingParty, RegistryIdentification,
        ShareClass,
    };

    fn number(raw: &str) -> CompanyNumber {
        CompanyNumber::parse(raw).unwrap()
    }

    fn profile(num: &str, name: &str) -> CompanyProfile {
        CompanyProfile {
            number: number(num),
            name: name.to_string(),
            status: CompanyStatus::Active,
            jurisdiction: None,
            incorporated_on: None,
            sic_codes: vec![],
            share_capital: vec![],
        }
    }

    fn corporate(name: &str, num: &str) -> ControllingParty {
        ControllingParty {
            name: name.to_string(),
            kind: ControlKind::CorporateEntity,
            nationality: None,
            country_of_residence: None,
            natures_of_control: vec!["ownership-of-shares-75-to-100-percent".into()],
            statement: None,
            identification: Some(RegistryIdentification {
                registration_number: Some(num.to_string()),
                ..Default::default()
            }),
        }
    }

    fn individual(name: &str) -> ControllingParty {
        ControllingParty {
            name: name.to_string(),
            kind: ControlKind::Individual,
            nationality: Some("British".into()),
            country_of_residence: Some("England".into()),
            natures_of_control: vec!["voting-rights-25-to-50-percent".into()],
            statement: None,
            identification: None,
        }
    }

    /// In-memory registry recording every call. Companies not explicitly
    /// registered fail with `NotFound`; companies registered with an error
    /// kind fail with a synthesized error of that kind.
    #[derive(Default)]
    struct FakeRegistry {
        profiles: HashMap<String, Result<CompanyProfile, ErrorKind>>,
        pscs: HashMap<String, Vec<ControllingParty>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRegistry {
        fn company(
            mut self,
            num: &str,
            name: &str,
            parties: Vec<ControllingParty>,
        ) -> Self {
            self.profiles
                .insert(num.to_string(), Ok(profile(num, name)));
            self.pscs.insert(num.to_string(), parties);
            self
        }

        fn failing(mut self, num: &str, kind: ErrorKind) -> Self {
            self.profiles.insert(num.to_string(), Err(kind));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn profile_calls_for(&self, num: &str) -> usize {
            let wanted = format!("profile {num}");
            self.calls().iter().filter(|c| **c == wanted).count()
        }

        fn synthesize(kind: ErrorKind, num: &CompanyNumber) -> RegistryError {
            match kind {
                ErrorKind::InvalidIdentifier => RegistryError::InvalidIdentifier {
                    number: num.to_string(),
                },
                ErrorKind::Auth => RegistryError::Auth {
                    detail: "HTTP 401".into(),
                },
                ErrorKind::NotFound => RegistryError::NotFound {
                    number: num.to_string(),
                },
                ErrorKind::Transport => RegistryError::Transport {
                    endpoint: format!("GET /company/{num}"),
                    status: Some(500),
                    detail: "boom".into(),
                },
            }
        }
    }

    #[async_trait]
    impl Registry for FakeRegistry {
        async fn profile(
            &self,
            num: &CompanyNumber,
        ) -> Result<CompanyProfile, RegistryError> {
            self.calls.lock().unwrap().push(format!("profile {num}"));
            match self.profiles.get(num.as_str()) {
                Some(Ok(profile)) => Ok(profile.clone()),
                Some(Err(kind)) => Err(Self::synthesize(*kind, num)),
                None => Err(RegistryError::NotFound {
                    number: num.to_string(),
                }),
            }
        }

        async fn controlling_parties(
            &self,
            num: &CompanyNumber,
        ) -> Result<Vec<ControllingParty>, RegistryError> {
            self.calls.lock().unwrap().push(format!("pscs {num}"));
            Ok(self.pscs.get(num.as_str()).cloned().unwrap_or_default())
        }

        async fn share_capital(
            &self,
            num: &CompanyNumber,
        ) -> Result<Vec<ShareClass>, RegistryError> {
            self.calls.lock().unwrap().push(format!("capital {num}"));
            Ok(vec![])
        }
    }

    async fn resolve(
        registry: FakeRegistry,
        root: &str,
        max_depth: usize,
    ) -> (OwnershipNode, Vec<String>) {
        let resolver = OwnershipResolver::new(registry, max_depth);
        let node = resolver.resolve(&number(root)).await.unwrap();
        let calls = resolver.registry.calls();
        (node, calls)
    }

    #[tokio::test]
    async fn depth_zero_resolves_only_the_root_psc_list() {
        let registry = FakeRegistry::default()
            .company(
                "01000001",
                "ROOT LTD",
                vec![corporate("PARENT LTD", "01000002"), individual("Jane Doe")],
            )
            .company("01000002", "PARENT LTD", vec![]);

        let (node, calls) = resolve(registry, "01000001", 0).await;

        assert_eq!(node.controllers.len(), 2);
        assert_eq!(node.controllers[0].status, ChildStatus::DepthLimitReached);
        assert!(node.controllers[0].child.is_none());
        assert_eq!(node.controllers[1].status, ChildStatus::NotCorporate);
        // Only the root was fetched.
        assert!(!calls.contains(&"profile 01000002".to_string()));
    }

    #[tokio::test]
    async fn empty_psc_list_yields_empty_children_without_error() {
        let registry = FakeRegistry::default().company("01000001", "LONELY LTD", vec![]);
        let (node, _) = resolve(registry, "01000001", 4).await;
        assert!(node.controllers.is_empty());
    }

    #[tokio::test]
    async fn cycle_through_two_companies_terminates_with_cycle_status() {
        let registry = FakeRegistry::default()
            .company("01000001", "A LTD", vec![corporate("B LTD", "01000002")])
            .company("01000002", "B LTD", vec![corporate("A LTD", "01000001")]);

        let (node, _) = resolve(registry, "01000001", 10).await;

        let b_entry = &node.controllers[0];
        assert_eq!(b_entry.status, ChildStatus::Resolved);
        let b_node = b_entry.child.as_ref().unwrap();
        let a_again = &b_node.controllers[0];
        assert_eq!(a_again.status, ChildStatus::CycleDetected);
        assert!(a_again.child.is_none());
    }

    #[tokio::test]
    async fn self_ownership_is_detected_immediately() {
        let registry = FakeRegistry::default().company(
            "01000001",
            "OUROBOROS LTD",
            vec![corporate("OUROBOROS LTD", "01000001")],
        );

        let (node, calls) = resolve(registry, "01000001", 5).await;

        assert_eq!(node.controllers[0].status, ChildStatus::CycleDetected);
        // The cycle check fires before any fetch for the repeated identifier.
        assert_eq!(
            calls.iter().filter(|c| **c == "profile 01000001").count(),
            1
        );
    }

    #[tokio::test]
    async fn no_fetch_is_issued_past_the_depth_limit() {
        let registry = FakeRegistry::default()
            .company("01000001", "A LTD", vec![corporate("B LTD", "01000002")])
            .company("01000002", "B LTD", vec![corporate("C LTD", "01000003")])
            .company("01000003", "C LTD", vec![]);

        let (node, calls) = resolve(registry, "01000001", 1).await;

        let b_node = node.controllers[0].child.as_ref().unwrap();
        assert_eq!(b_node.controllers[0].status, ChildStatus::DepthLimitReached);
        assert!(!calls.contains(&"profile 01000003".to_string()));
    }

    #[tokio::test]
    async fn root_auth_failure_propagates_with_no_further_calls() {
        let registry = FakeRegistry::default().failing("01000001", ErrorKind::Auth);
        let resolver = OwnershipResolver::new(registry, 4);

        let err = resolver.resolve(&number("01000001")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(resolver.registry.calls(), vec!["profile 01000001".to_string()]);
    }

    #[tokio::test]
    async fn root_not_found_propagates_verbatim() {
        let registry = FakeRegistry::default();
        let resolver = OwnershipResolver::new(registry, 4);
        let err = resolver.resolve(&number("01000001")).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn failed_branch_does_not_abort_siblings() {
        let registry = FakeRegistry::default()
            .company(
                "01000001",
                "ROOT LTD",
                vec![
                    corporate("BROKEN LTD", "01000002"),
                    corporate("HEALTHY LTD", "01000003"),
                ],
            )
            .failing("01000002", ErrorKind::Transport)
            .company("01000003", "HEALTHY LTD", vec![individual("Jane Doe")]);

        let (node, _) = resolve(registry, "01000001", 4).await;

        assert_eq!(
            node.controllers[0].status,
            ChildStatus::LookupFailed(ErrorKind::Transport)
        );
        assert!(node.controllers[0].child.is_none());

        assert_eq!(node.controllers[1].status, ChildStatus::Resolved);
        let healthy = node.controllers[1].child.as_ref().unwrap();
        assert_eq!(healthy.controllers[0].status, ChildStatus::NotCorporate);
    }

    #[tokio::test]
    async fn children_preserve_registry_order() {
        let registry = FakeRegistry::default()
            .company(
                "01000001",
                "ROOT LTD",
                vec![
                    individual("Zara First"),
                    corporate("MIDDLE LTD", "01000002"),
                    individual("Adam Last"),
                ],
            )
            .company("01000002", "MIDDLE LTD", vec![]);

        let (node, _) = resolve(registry, "01000001", 4).await;

        let names: Vec<&str> = node
            .controllers
            .iter()
            .map(|c| c.party.name.as_str())
            .collect();
        assert_eq!(names, vec!["Zara First", "MIDDLE LTD", "Adam Last"]);
    }

    #[tokio::test]
    async fn shared_parent_across_sibling_branches_is_not_a_cycle() {
        // B and C are siblings under A; both are owned by D. D must resolve
        // independently in each branch (shared ownership, not a cycle).
        let registry = FakeRegistry::default()
            .company(
                "01000001",
                "A LTD",
                vec![
                    corporate("B LTD", "01000002"),
                    corporate("C LTD", "01000003"),
                ],
            )
            .company("01000002", "B LTD", vec![corporate("D LTD", "01000004")])
            .company("01000003", "C LTD", vec![corporate("D LTD", "01000004")])
            .company("01000004", "D LTD", vec![]);

        let (node, calls) = resolve(registry, "01000001", 4).await;

        for branch in &node.controllers {
            let child = branch.child.as_ref().unwrap();
            assert_eq!(child.controllers[0].status, ChildStatus::Resolved);
        }
        // Fresh fetch per branch: no cross-branch caching.
        let registry_calls = calls.iter().filter(|c| **c == "profile 01000004").count();
        assert_eq!(registry_calls, 2);
    }

    #[tokio::test]
    async fn overseas_corporate_controller_degrades_to_not_corporate() {
        let overseas = ControllingParty {
            identification: Some(RegistryIdentification {
                registration_number: Some("HRB 12345".into()),
                country_registered: Some("Germany".into()),
                ..Default::default()
            }),
            ..corporate("AUSLAND GMBH", "00000000")
        };
        let registry =
            FakeRegistry::default().company("01000001", "ROOT LTD", vec![overseas]);

        let (node, calls) = resolve(registry, "01000001", 4).await;

        assert_eq!(node.controllers[0].status, ChildStatus::NotCorporate);
        assert_eq!(calls.iter().filter(|c| c.starts_with("profile")).count(), 1);
    }

    #[tokio::test]
    async fn unknown_kind_never_recurses() {
        let odd = ControllingParty {
            kind: ControlKind::Other,
            ..corporate("MYSTERY ENTITY", "01000002")
        };
        let registry = FakeRegistry::default()
            .company("01000001", "ROOT LTD", vec![odd])
            .company("01000002", "MYSTERY ENTITY", vec![]);

        let (node, calls) = resolve(registry, "01000001", 4).await;

        assert_eq!(node.controllers[0].status, ChildStatus::NotCorporate);
        assert!(!calls.contains(&"profile 01000002".to_string()));
    }
}
