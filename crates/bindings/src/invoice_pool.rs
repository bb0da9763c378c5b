use alloy_sol_types::sol;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq, serde::Serialize)]
    interface InvoicePool {
        struct Pool {
            uint256 tokenId;
            uint256 targetAmount;
            uint256 fundedAmount;
            uint256 investorCount;
            uint256 interestRate;
            uint256 dueDate;
            address exporter;
            uint8 status;
            uint256 openedAt;
            uint256 filledAt;
            uint256 disbursedAt;
            uint256 closedAt;
        }

        struct Investment {
            address investor;
            uint256 amount;
            uint256 expectedReturn;
            uint256 actualReturn;
            bool claimed;
            uint256 investedAt;
        }

        error AccessControlBadConfirmation();
        error AccessControlUnauthorizedAccount(address account, bytes32 neededRole);
        error EnforcedPause();
        error ExpectedPause();
        error ReentrancyGuardReentrantCall();

        event DisbursementRecorded(uint256 indexed tokenId, address indexed exporter, uint256 amount);
        event ExcessRepaymentRecorded(uint256 indexed tokenId, address indexed recipient, uint256 amount);
        event InvestmentRecorded(uint256 indexed tokenId, address indexed investor, uint256 amount, uint256 expectedReturn);
        event InvestorReturnRecorded(uint256 indexed tokenId, address indexed investor, uint256 amount);
        event Paused(address account);
        event PoolClosed(uint256 indexed tokenId);
        event PoolCreated(uint256 indexed tokenId, uint256 targetAmount, uint256 interestRate);
        event PoolDefaulted(uint256 indexed tokenId);
        event PoolFilled(uint256 indexed tokenId, uint256 totalAmount, uint256 investorCount);
        event RepaymentRecorded(uint256 indexed tokenId, uint256 amount);
        event RoleAdminChanged(bytes32 indexed role, bytes32 indexed previousAdminRole, bytes32 indexed newAdminRole);
        event RoleGranted(bytes32 indexed role, address indexed account, address indexed sender);
        event RoleRevoked(bytes32 indexed role, address indexed account, address indexed sender);
        event Unpaused(address account);

        function DEFAULT_ADMIN_ROLE() external view returns (bytes32);
        function OPERATOR_ROLE() external view returns (bytes32);

        function createPool(uint256 tokenId) external;
        function getInvestorPools(address investor) external view returns (uint256[]);
        function getPool(uint256 tokenId) external view returns (Pool memory);
        function getPoolInvestments(uint256 tokenId) external view returns (Investment[] memory);
        function getRemainingCapacity(uint256 tokenId) external view returns (uint256);
        function getRoleAdmin(bytes32 role) external view returns (bytes32);
        function grantRole(bytes32 role, address account) external;
        function hasRole(bytes32 role, address account) external view returns (bool);
        function investorPools(address, uint256) external view returns (uint256);
        function invoiceNFT() external view returns (address);
        function markDefaulted(uint256 tokenId) external;
        function pause() external;
        function paused() external view returns (bool);
        function platformFeeBps() external view returns (uint256);
        function platformWallet() external view returns (address);
        function poolInvestments(uint256, uint256) external view returns (
            address investor,
            uint256 amount,
            uint256 expectedReturn,
            uint256 actualReturn,
            bool claimed,
            uint256 investedAt
        );
        function pools(uint256) external view returns (
            uint256 tokenId,
            uint256 targetAmount,
            uint256 fundedAmount,
            uint256 investorCount,
            uint256 interestRate,
            uint256 dueDate,
            address exporter,
            uint8 status,
            uint256 openedAt,
            uint256 filledAt,
            uint256 disbursedAt,
            uint256 closedAt
        );
        function recordDisbursement(uint256 tokenId) external;
        function recordExcessRepayment(uint256 tokenId, address recipient, uint256 amount) external;
        function recordInvestment(uint256 tokenId, address investor, uint256 amount) external;
        function recordRepayment(uint256 tokenId, uint256 totalAmount, uint256[] investorReturns) external;
        function renounceRole(bytes32 role, address callerConfirmation) external;
        function revokeRole(bytes32 role, address account) external;
        function setPlatformFee(uint256 newFeeBps) external;
        function setPlatformWallet(address newWallet) external;
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
        function unpause() external;
    }
);
