//! Decision table tests for role and ownership checks.

use crate::authz::{
    AccessDenied, Decision, DenyReason, EmployeeScope, Operation, Principal, Role, Target,
    TaskScope, authorize_role, decide,
};
use crate::identity::domain::{EmployeeId, ManagerId, ManagerRole};
use rstest::{fixture, rstest};

struct Graph {
    owner: ManagerId,
    stranger: ManagerId,
    employee: EmployeeId,
    colleague: EmployeeId,
}

impl Graph {
    fn owner(&self) -> Principal {
        Principal::manager(self.owner, ManagerRole::Manager)
    }

    fn stranger(&self) -> Principal {
        Principal::manager(self.stranger, ManagerRole::Admin)
    }

    fn employee(&self) -> Principal {
        Principal::employee(self.employee)
    }

    fn colleague(&self) -> Principal {
        Principal::employee(self.colleague)
    }

    fn employee_target(&self) -> Target {
        Target::Employee(EmployeeScope {
            employee_id: self.employee,
            owner_id: self.owner,
        })
    }

    fn task_target(&self) -> Target {
        Target::Task(TaskScope {
            assigned_by: self.owner,
            assigned_to: self.employee,
        })
    }
}

#[fixture]
fn graph() -> Graph {
    Graph {
        owner: ManagerId::new(),
        stranger: ManagerId::new(),
        employee: EmployeeId::new(),
        colleague: EmployeeId::new(),
    }
}

#[rstest]
#[case(Operation::CreateEmployee, Role::Admin, true)]
#[case(Operation::CreateEmployee, Role::Employee, false)]
#[case(Operation::UpdateOwnProfile, Role::Manager, false)]
#[case(Operation::UpdateOwnProfile, Role::Employee, true)]
#[case(Operation::UpdateTaskStatus, Role::Manager, false)]
#[case(Operation::ReviewTask, Role::Employee, false)]
#[case(Operation::ReadTask, Role::Employee, true)]
#[case(Operation::ViewStatistics, Role::Employee, true)]
#[case(Operation::RequestAdvice, Role::Employee, false)]
fn role_table(#[case] operation: Operation, #[case] role: Role, #[case] allowed: bool) {
    assert_eq!(operation.allowed_roles().contains(&role), allowed);
}

#[rstest]
fn role_failure_names_required_roles(graph: Graph) {
    let decision = authorize_role(&graph.employee(), Operation::CreateEmployee);
    let Decision::Deny(reason) = decision else {
        panic!("employee must not create employees");
    };
    assert!(reason.is_role_failure());
    assert_eq!(reason.to_string(), "access denied: admin or manager only");
}

#[rstest]
fn employee_only_operation_names_employee_role(graph: Graph) {
    let denied = authorize_role(&graph.owner(), Operation::UpdateTaskStatus).into_result();
    assert_eq!(
        denied.map_err(|err| err.to_string()),
        Err("access denied: employee only".to_owned())
    );
}

#[rstest]
fn unscoped_operations_ignore_target(graph: Graph) {
    assert!(decide(&graph.owner(), Operation::ListTasks, &Target::None).is_admit());
    assert!(decide(&graph.employee(), Operation::ViewStatistics, &Target::None).is_admit());
}

#[rstest]
fn read_employee_admits_owner_and_self_only(graph: Graph) {
    let target = graph.employee_target();
    assert!(decide(&graph.owner(), Operation::ReadEmployee, &target).is_admit());
    assert!(decide(&graph.employee(), Operation::ReadEmployee, &target).is_admit());
    assert_eq!(
        decide(&graph.stranger(), Operation::ReadEmployee, &target),
        Decision::Deny(DenyReason::NotFoundOrUnauthorized)
    );
    assert_eq!(
        decide(&graph.colleague(), Operation::ReadEmployee, &target),
        Decision::Deny(DenyReason::NotFoundOrUnauthorized)
    );
}

#[rstest]
#[case(Operation::UpdateEmployee)]
#[case(Operation::DeleteEmployee)]
fn owner_only_employee_mutations(graph: Graph, #[case] operation: Operation) {
    let target = graph.employee_target();
    assert!(decide(&graph.owner(), operation, &target).is_admit());
    assert!(!decide(&graph.stranger(), operation, &target).is_admit());
}

#[rstest]
fn own_profile_is_limited_to_the_employee(graph: Graph) {
    let target = graph.employee_target();
    assert!(decide(&graph.employee(), Operation::UpdateOwnProfile, &target).is_admit());
    assert!(!decide(&graph.colleague(), Operation::UpdateOwnProfile, &target).is_admit());
}

#[rstest]
fn assigning_to_foreign_employee_is_denied_with_reason(graph: Graph) {
    let result = decide(
        &graph.stranger(),
        Operation::AssignTask,
        &graph.employee_target(),
    )
    .into_result();
    assert_eq!(result, Err(AccessDenied(DenyReason::ForeignAssignee)));
    assert_eq!(
        DenyReason::ForeignAssignee.to_string(),
        "you can only assign tasks to your own employees"
    );
}

#[rstest]
fn status_updates_belong_to_assignee(graph: Graph) {
    let target = graph.task_target();
    assert!(decide(&graph.employee(), Operation::UpdateTaskStatus, &target).is_admit());
    assert!(!decide(&graph.colleague(), Operation::UpdateTaskStatus, &target).is_admit());
}

#[rstest]
#[case(Operation::ReviewTask)]
#[case(Operation::EditTask)]
#[case(Operation::DeleteTask)]
fn assigner_only_task_operations(graph: Graph, #[case] operation: Operation) {
    let target = graph.task_target();
    assert!(decide(&graph.owner(), operation, &target).is_admit());
    assert_eq!(
        decide(&graph.stranger(), operation, &target),
        Decision::Deny(DenyReason::NotFoundOrUnauthorized)
    );
}

#[rstest]
fn read_task_admits_both_ends_of_the_edge(graph: Graph) {
    let target = graph.task_target();
    assert!(decide(&graph.owner(), Operation::ReadTask, &target).is_admit());
    assert!(decide(&graph.employee(), Operation::ReadTask, &target).is_admit());
    assert!(!decide(&graph.colleague(), Operation::ReadTask, &target).is_admit());
    assert!(!decide(&graph.stranger(), Operation::ReadTask, &target).is_admit());
}

#[rstest]
fn mismatched_target_kind_is_denied(graph: Graph) {
    assert!(!decide(&graph.owner(), Operation::ReviewTask, &graph.employee_target()).is_admit());
    assert!(!decide(&graph.owner(), Operation::ReadEmployee, &Target::None).is_admit());
}

#[rstest]
fn admin_has_no_cross_manager_reach(graph: Graph) {
    let admin = Principal::manager(graph.stranger, ManagerRole::Admin);
    assert_eq!(admin.role(), Role::Admin);
    assert!(!decide(&admin, Operation::EditTask, &graph.task_target()).is_admit());
}
