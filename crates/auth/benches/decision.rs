use criterion::{Criterion, black_box, criterion_group, criterion_main};

use consola_auth::{
    AccessDecisionEngine, AdminGeneralAllowList, Permission, Principal, Requirement, Role,
};
use consola_core::UserId;

fn wide_principal(role: &'static str, permission_count: usize) -> Principal {
    Principal::new(
        UserId::new(),
        [Role::new(role)],
        (0..permission_count).map(|i| Permission::from(format!("PERMISSION_{i}"))),
    )
}

fn bench_evaluate(c: &mut Criterion) {
    let engine = AccessDecisionEngine::new(AdminGeneralAllowList::new([
        "BUSINESS_CLIENT_READ",
        "BUSINESS_INVOICE_READ",
        "BUSINESS_PAYMENT_READ",
    ]));

    let superadmin = wide_principal("SUPERADMIN", 0);
    let admin_general = wide_principal("ADMINISTRADOR_GENERAL", 32);
    let regular = wide_principal("VIEWER", 32);

    let requirement = Requirement::builder()
        .permission("PERMISSION_7")
        .permissions(["BUSINESS_CLIENT_READ", "PERMISSION_31"])
        .role("VIEWER")
        .build();

    c.bench_function("evaluate/superadmin_bypass", |b| {
        b.iter(|| engine.evaluate(black_box(&superadmin), black_box(&requirement)))
    });

    c.bench_function("evaluate/admin_general_allow_list", |b| {
        b.iter(|| engine.evaluate(black_box(&admin_general), black_box(&requirement)))
    });

    c.bench_function("evaluate/regular_membership", |b| {
        b.iter(|| engine.evaluate(black_box(&regular), black_box(&requirement)))
    });

    c.bench_function("evaluate/unrestricted", |b| {
        let unrestricted = Requirement::unrestricted();
        b.iter(|| engine.evaluate(black_box(&regular), black_box(&unrestricted)))
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
