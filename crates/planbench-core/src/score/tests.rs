//! Tests for score types.

use super::*;

// ============================================================================
// SimpleScore Tests
// ============================================================================

mod simple_score {
    use super::*;

    #[test]
    fn test_feasibility() {
        assert!(SimpleScore::of(0).is_feasible());
        assert!(!SimpleScore::of(-1).is_feasible());
    }

    #[test]
    fn test_comparison() {
        assert!(SimpleScore::of(-5) > SimpleScore::of(-10));
        assert!(SimpleScore::of(0).is_better_than(&SimpleScore::of(-5)));
    }

    #[test]
    fn test_divide_rounds() {
        assert_eq!(SimpleScore::of(-7).divide(2.0), SimpleScore::of(-4));
        assert_eq!(SimpleScore::of(9).divide(3.0), SimpleScore::of(3));
    }

    #[test]
    fn test_parse() {
        assert_eq!(SimpleScore::parse("-120").unwrap(), SimpleScore::of(-120));
        assert_eq!(SimpleScore::parse(" 7 ").unwrap(), SimpleScore::of(7));
        assert!(SimpleScore::parse("-5init").is_err());
        assert_eq!(SimpleScore::from_level_numbers(&[-5]), SimpleScore::of(-5));
        assert!(SimpleScore::parse("abc").is_err());
    }

    #[test]
    fn test_string_repr_parses_back() {
        let score = SimpleScore::of(-120);
        assert_eq!(SimpleScore::parse(&score.to_string_repr()).unwrap(), score);
    }
}

// ============================================================================
// HardSoftScore Tests
// ============================================================================

mod hard_soft_score {
    use super::*;

    #[test]
    fn test_hard_dominates_soft() {
        assert!(HardSoftScore::of(0, -1000) > HardSoftScore::of(-1, 0));
        assert!(HardSoftScore::of(0, -5) > HardSoftScore::of(0, -6));
    }

    #[test]
    fn test_arithmetic() {
        let sum = HardSoftScore::of(-1, -10) + HardSoftScore::of(-2, -20);
        assert_eq!(sum, HardSoftScore::of(-3, -30));
        assert_eq!(sum.divide(3.0), HardSoftScore::of(-1, -10));
        assert_eq!(sum - HardSoftScore::of(-3, -30), HardSoftScore::zero());
    }

    #[test]
    fn test_level_numbers() {
        assert_eq!(HardSoftScore::levels_count(), 2);
        assert_eq!(HardSoftScore::of(-2, 7).to_level_numbers(), vec![-2, 7]);
        assert_eq!(
            HardSoftScore::from_level_numbers(&[-2, 7]),
            HardSoftScore::of(-2, 7)
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            HardSoftScore::parse("0hard/-5soft").unwrap(),
            HardSoftScore::of(0, -5)
        );
        assert_eq!(HardSoftScore::of(-1, 3).to_string_repr(), "-1hard/3soft");
    }

    #[test]
    fn test_parse_errors() {
        assert!(HardSoftScore::parse("0hard").is_err());
        assert!(HardSoftScore::parse("0/-5soft").is_err());
        assert!(HardSoftScore::parse("xhard/0soft").is_err());
    }
}
