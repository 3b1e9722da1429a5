use crate::bits::PopcountImpl;
use crate::caps::{capabilities, init_with_policy, Arch, CpuCaps, HostFeatures, VectorPolicy};

fn full_host() -> HostFeatures {
    HostFeatures {
        avx2: true,
        bmi2: true,
        popcnt: true,
    }
}

#[test]
fn test_capable_host_gets_all_capabilities() {
    let caps = CpuCaps::resolve(Arch::X86_64, full_host(), VectorPolicy::Auto);

    assert!(caps.wide_vector);
    assert!(caps.bit_manip);
    assert!(caps.decode_vector);
    assert!(caps.vector_union);
    assert!(caps.x64);
    assert_eq!(caps.popcount, PopcountImpl::Hardware);
}

#[test]
fn test_missing_either_prerequisite_disables_vectors() {
    let no_bmi = HostFeatures {
        avx2: true,
        bmi2: false,
        popcnt: true,
    };
    let no_avx = HostFeatures {
        avx2: false,
        bmi2: true,
        popcnt: true,
    };

    for host in [no_bmi, no_avx] {
        for policy in [VectorPolicy::Auto, VectorPolicy::Forced] {
            let caps = CpuCaps::resolve(Arch::X86_64, host, policy);
            assert!(
                !caps.wide_vector,
                "host {host:?} with {policy:?} must not vectorize"
            );
            assert!(!caps.bit_manip);
            assert!(!caps.decode_vector);
            assert!(!caps.vector_union);
        }
    }
}

#[test]
fn test_disabled_policy_wins_over_capable_host() {
    let caps = CpuCaps::resolve(Arch::X86_64, full_host(), VectorPolicy::Disabled);

    assert!(!caps.wide_vector);
    assert!(!caps.bit_manip);
    assert!(!caps.decode_vector);
    assert!(!caps.vector_union);
    // the x86-64 target keeps its x64 classification without the vector capability
    assert!(caps.x64);
}

#[test]
fn test_forced_policy_is_clamped_by_missing_prerequisites() {
    let forced = CpuCaps::resolve(Arch::X86_64, HostFeatures::none(), VectorPolicy::Forced);
    let auto = CpuCaps::resolve(Arch::X86_64, HostFeatures::none(), VectorPolicy::Auto);

    assert!(!forced.wide_vector);
    assert_eq!(forced, auto);
}

#[test]
fn test_forced_policy_with_prerequisites_vectorizes() {
    let caps = CpuCaps::resolve(Arch::X86_64, full_host(), VectorPolicy::Forced);
    assert!(caps.wide_vector);
}

#[test]
fn test_popcount_selection_ignores_vector_policy() {
    let caps = CpuCaps::resolve(Arch::X86_64, full_host(), VectorPolicy::Disabled);
    assert_eq!(caps.popcount, PopcountImpl::Hardware);

    let no_popcnt = HostFeatures {
        avx2: true,
        bmi2: true,
        popcnt: false,
    };
    let caps = CpuCaps::resolve(Arch::X86_64, no_popcnt, VectorPolicy::Auto);
    assert_eq!(caps.popcount, PopcountImpl::Generic);
}

#[test]
fn test_popcount_requires_x64_family() {
    let host = HostFeatures {
        avx2: false,
        bmi2: false,
        popcnt: true,
    };
    let caps = CpuCaps::resolve(Arch::Aarch64, host, VectorPolicy::Auto);
    assert_eq!(caps.popcount, PopcountImpl::Generic);
}

#[test]
fn exhaustive_resolution_invariants() {
    let archs = [
        Arch::X86_64,
        Arch::X86,
        Arch::Aarch64,
        Arch::Arm,
        Arch::Riscv64,
        Arch::Other,
    ];
    let policies = [
        VectorPolicy::Auto,
        VectorPolicy::Disabled,
        VectorPolicy::Forced,
    ];

    for arch in archs {
        for bits in 0u8..8 {
            let features = HostFeatures {
                avx2: bits & 1 != 0,
                bmi2: bits & 2 != 0,
                popcnt: bits & 4 != 0,
            };
            for policy in policies {
                let caps = CpuCaps::resolve(arch, features, policy);

                // vector capabilities are granted and revoked as a unit
                assert_eq!(caps.bit_manip, caps.wide_vector);
                assert_eq!(caps.decode_vector, caps.wide_vector);
                assert_eq!(caps.vector_union, caps.wide_vector);

                // never granted without prerequisites, never granted under an opt-out
                assert!(!caps.wide_vector || (features.avx2 && features.bmi2));
                assert!(!caps.wide_vector || policy != VectorPolicy::Disabled);

                assert_eq!(caps.x64, arch.is_x64_family() || caps.wide_vector);
                assert_eq!(
                    caps.popcount,
                    if caps.x64 && features.popcnt {
                        PopcountImpl::Hardware
                    } else {
                        PopcountImpl::Generic
                    }
                );

                // resolution is pure
                assert_eq!(caps, CpuCaps::resolve(arch, features, policy));
            }
        }
    }
}

#[test]
fn test_detect_matches_current_target() {
    let caps = CpuCaps::detect();
    assert_eq!(caps.arch, Arch::current());
    assert_eq!(caps.bit_manip, caps.wide_vector);

    #[cfg(not(target_arch = "x86_64"))]
    {
        assert!(!caps.wide_vector);
        assert_eq!(caps.popcount, PopcountImpl::Generic);
    }
}

#[test]
fn test_host_feature_probe_is_stable() {
    assert_eq!(HostFeatures::detect(), HostFeatures::detect());

    #[cfg(not(target_arch = "x86_64"))]
    assert_eq!(HostFeatures::detect(), HostFeatures::none());
}

#[test]
fn test_process_record_is_stable() {
    let first = capabilities();
    assert_eq!(first, capabilities());
    assert_eq!(first.arch, Arch::current());

    // once a record is cached, late initialization returns it unchanged
    let effective = init_with_policy(VectorPolicy::Disabled);
    assert_eq!(effective, first);
    assert_eq!(capabilities(), first);
}

#[test]
fn test_arch_names() {
    assert_eq!(Arch::X86_64.name(), "x86_64");
    assert_eq!(Arch::X86.name(), "x86");
    assert_eq!(Arch::Aarch64.name(), "aarch64");
    assert_eq!(Arch::Arm.name(), "arm");
    assert_eq!(Arch::Riscv64.name(), "riscv64");
    assert_eq!(Arch::Other.name(), "other");
}

#[test]
fn test_only_x86_64_is_x64_family() {
    let archs = [
        Arch::X86_64,
        Arch::X86,
        Arch::Aarch64,
        Arch::Arm,
        Arch::Riscv64,
        Arch::Other,
    ];
    for arch in archs {
        assert_eq!(arch.is_x64_family(), arch == Arch::X86_64);
    }
}

#[test]
fn test_current_arch_matches_build() {
    #[cfg(target_arch = "x86_64")]
    assert_eq!(Arch::current(), Arch::X86_64);
    #[cfg(target_arch = "aarch64")]
    assert_eq!(Arch::current(), Arch::Aarch64);
}

#[test]
fn test_defaults() {
    assert_eq!(VectorPolicy::default(), VectorPolicy::Auto);
    assert_eq!(HostFeatures::default(), HostFeatures::none());
    assert_eq!(PopcountImpl::default(), PopcountImpl::Generic);
}
