//! Pure authorization decisions: claims + action -> allow/deny.
//!
//! Services evaluate the policy before any store mutation, so a deny never
//! leaves partial writes behind.

use std::fmt;

use uuid::Uuid;

use crate::domain::{Claims, Role};
use crate::errors::ServiceError;

/// What the caller wants to do, with the identifiers the decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Public reads: job/company listings, search, lookups, similar jobs.
    Browse,
    /// Operations on the caller's own user record.
    ManageSelf,
    ViewUser { user: Uuid },
    CreateCompany,
    /// Read/update/delete the company owned by `owner`.
    ManageCompany { owner: Uuid },
    /// Post a job for `company` (taken from the caller's claims).
    CreateJob { company: Option<Uuid> },
    UpdateJob { company: Uuid },
    DeleteJob { company: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    RoleMismatch,
    OwnershipMismatch,
}

impl DenyReason {
    /// Stable reason code for responses and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "unauthenticated",
            DenyReason::RoleMismatch => "role-mismatch",
            DenyReason::OwnershipMismatch => "ownership-mismatch",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(ServiceError::Unauthenticated),
            Decision::Deny(reason) => Err(ServiceError::Forbidden(reason)),
        }
    }
}

/// Decide whether `claims` may perform `action`.
pub fn authorize(claims: Option<&Claims>, action: &Action) -> Decision {
    if let Action::Browse = action {
        return Decision::Allow;
    }
    let Some(claims) = claims else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };
    let is_company = claims.role == Role::Company;

    match *action {
        Action::Browse | Action::ManageSelf => Decision::Allow,
        // 是否已拥有公司由协调器对照存储判断
        Action::CreateCompany if is_company => Decision::Allow,
        Action::CreateCompany => Decision::Deny(DenyReason::RoleMismatch),
        Action::CreateJob { company } => match (is_company, company, claims.company_id) {
            (false, _, _) | (true, None, _) | (true, _, None) => Decision::Deny(DenyReason::RoleMismatch),
            (true, Some(target), Some(own)) if target == own => Decision::Allow,
            _ => Decision::Deny(DenyReason::OwnershipMismatch),
        },
        Action::UpdateJob { company } | Action::DeleteJob { company } => {
            if !is_company {
                Decision::Deny(DenyReason::RoleMismatch)
            } else if claims.company_id == Some(company) {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::OwnershipMismatch)
            }
        }
        Action::ManageCompany { owner } => {
            if is_company && claims.id == owner {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::OwnershipMismatch)
            }
        }
        // Any company-role account may read any profile.
        Action::ViewUser { user } => {
            if claims.id == user || is_company {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::RoleMismatch)
            }
        }
    }
}

/// Shorthand for `authorize(..).into_result()`.
pub fn require(claims: Option<&Claims>, action: Action) -> Result<(), ServiceError> {
    authorize(claims, &action).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company_rep(company: Option<Uuid>) -> Claims {
        Claims { id: Uuid::new_v4(), role: Role::Company, company_id: company }
    }

    fn seeker() -> Claims {
        Claims { id: Uuid::new_v4(), role: Role::Jobseeker, company_id: None }
    }

    #[test]
    fn browse_is_public() {
        assert_eq!(authorize(None, &Action::Browse), Decision::Allow);
    }

    #[test]
    fn private_actions_require_claims() {
        let actions = [
            Action::ManageSelf,
            Action::ViewUser { user: Uuid::new_v4() },
            Action::CreateCompany,
            Action::ManageCompany { owner: Uuid::new_v4() },
            Action::CreateJob { company: Some(Uuid::new_v4()) },
            Action::UpdateJob { company: Uuid::new_v4() },
            Action::DeleteJob { company: Uuid::new_v4() },
        ];
        for action in actions {
            assert_eq!(authorize(None, &action), Decision::Deny(DenyReason::Unauthenticated), "{action:?}");
        }
    }

    #[test]
    fn create_company_needs_company_role() {
        assert_eq!(authorize(Some(&seeker()), &Action::CreateCompany), Decision::Deny(DenyReason::RoleMismatch));
        assert_eq!(authorize(Some(&company_rep(None)), &Action::CreateCompany), Decision::Allow);
        // an existing company is the coordinator's call (DuplicateOwnership), not a deny
        assert_eq!(authorize(Some(&company_rep(Some(Uuid::new_v4()))), &Action::CreateCompany), Decision::Allow);
    }

    #[test]
    fn create_job_requires_matching_company() {
        let c = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(authorize(Some(&company_rep(Some(c))), &Action::CreateJob { company: Some(c) }).is_allowed());
        // flipping either side denies
        assert_eq!(
            authorize(Some(&company_rep(Some(c))), &Action::CreateJob { company: Some(other) }),
            Decision::Deny(DenyReason::OwnershipMismatch)
        );
        assert_eq!(
            authorize(Some(&company_rep(Some(other))), &Action::CreateJob { company: Some(c) }),
            Decision::Deny(DenyReason::OwnershipMismatch)
        );
        assert_eq!(
            authorize(Some(&company_rep(None)), &Action::CreateJob { company: None }),
            Decision::Deny(DenyReason::RoleMismatch)
        );
        let mut s = seeker();
        s.company_id = Some(c);
        assert_eq!(authorize(Some(&s), &Action::CreateJob { company: Some(c) }), Decision::Deny(DenyReason::RoleMismatch));
    }

    #[test]
    fn job_mutation_only_by_owning_company() {
        let owner = Uuid::new_v4();
        let rival = Uuid::new_v4();
        assert!(authorize(Some(&company_rep(Some(owner))), &Action::UpdateJob { company: owner }).is_allowed());
        assert!(authorize(Some(&company_rep(Some(owner))), &Action::DeleteJob { company: owner }).is_allowed());
        assert_eq!(
            authorize(Some(&company_rep(Some(rival))), &Action::UpdateJob { company: owner }),
            Decision::Deny(DenyReason::OwnershipMismatch)
        );
        assert_eq!(
            authorize(Some(&company_rep(None)), &Action::DeleteJob { company: owner }),
            Decision::Deny(DenyReason::OwnershipMismatch)
        );
        assert_eq!(authorize(Some(&seeker()), &Action::UpdateJob { company: owner }), Decision::Deny(DenyReason::RoleMismatch));
    }

    #[test]
    fn company_management_only_by_owner() {
        let rep = company_rep(Some(Uuid::new_v4()));
        assert!(authorize(Some(&rep), &Action::ManageCompany { owner: rep.id }).is_allowed());
        assert_eq!(
            authorize(Some(&rep), &Action::ManageCompany { owner: Uuid::new_v4() }),
            Decision::Deny(DenyReason::OwnershipMismatch)
        );
    }

    #[test]
    fn profile_visible_to_self_and_company_accounts() {
        let me = seeker();
        let someone = Uuid::new_v4();
        assert!(authorize(Some(&me), &Action::ViewUser { user: me.id }).is_allowed());
        assert_eq!(authorize(Some(&me), &Action::ViewUser { user: someone }), Decision::Deny(DenyReason::RoleMismatch));
        assert!(authorize(Some(&company_rep(None)), &Action::ViewUser { user: someone }).is_allowed());
    }

    #[test]
    fn deny_maps_to_error_taxonomy() {
        assert!(matches!(Decision::Deny(DenyReason::Unauthenticated).into_result(), Err(ServiceError::Unauthenticated)));
        assert!(matches!(
            Decision::Deny(DenyReason::OwnershipMismatch).into_result(),
            Err(ServiceError::Forbidden(DenyReason::OwnershipMismatch))
        ));
    }
}
